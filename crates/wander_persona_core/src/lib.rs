pub mod biorhythm;
pub mod domain;
pub mod leaderboard;
pub mod ports;
pub mod prompt;
pub mod quiz;
pub mod recommend;
pub mod settings;

pub use biorhythm::{BiorhythmPercent, BiorhythmReading};
pub use domain::{
    ActorKey, AdminSettings, Branding, DestinationDetails, GeneratedMedia, LikeMark,
    Recommendation, RecommendationKind, RecommendationRequest, RecommendationResult,
    StoredSession,
};
pub use leaderboard::{ExclusionFilter, LeaderboardRow, LikeStatus, LikeToggleOutcome};
pub use ports::{
    AdminSettingsSource, AuthTokenVerifier, BlobStorageService, ConditionInterpretationService,
    DatabaseService, DestinationGenerationService, GeoLocationService, ImageGenerationService,
    LikeLookup, PortError, PortResult,
};
pub use recommend::RecommendationEngine;
pub use settings::{Clock, SettingsCache, SystemClock};
