//! crates/wander_persona_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{
    ActorKey, AdminSettings, Branding, DestinationDetails, GeneratedMedia, StoredSession,
};
use crate::leaderboard::{LeaderboardRow, LikeStatus, LikeToggleOutcome};
use crate::prompt::DestinationPromptInput;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Configuration unavailable: {0}")]
    Configuration(String),
    #[error("Model output did not match the expected schema: {0}")]
    SchemaViolation(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Identifies which stored session a like operation should land on when the
/// caller is not addressing a row by primary key.
#[derive(Debug, Clone, Default)]
pub struct LikeLookup {
    /// Authenticated user id; matched against the session id when present.
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Session Management ---
    async fn insert_session(&self, session: StoredSession) -> PortResult<()>;

    async fn get_session_by_id(&self, session_id: Uuid) -> PortResult<StoredSession>;

    async fn update_session_image_by_email(
        &self,
        email: &str,
        image_url: &str,
    ) -> PortResult<()>;

    // --- Likes ---
    /// Atomically toggles the per-day like for `actor` on the session matching
    /// `destination` (narrowed by `lookup`), creating an anonymous placeholder
    /// session when none exists. The read-modify-write must serialize
    /// concurrent toggles for the same row.
    async fn toggle_like(
        &self,
        destination: &str,
        lookup: &LikeLookup,
        actor: &ActorKey,
        day: NaiveDate,
    ) -> PortResult<LikeToggleOutcome>;

    async fn like_status(
        &self,
        destination: &str,
        actor: &ActorKey,
        day: NaiveDate,
    ) -> PortResult<LikeStatus>;

    /// All sessions projected to leaderboard rows, ordered by likes descending.
    async fn list_sessions_by_likes(&self) -> PortResult<Vec<LeaderboardRow>>;

    // --- Branding ---
    async fn latest_branding(&self) -> PortResult<Option<Branding>>;

    async fn insert_branding(&self, branding: Branding) -> PortResult<()>;
}

#[async_trait]
pub trait DestinationGenerationService: Send + Sync {
    /// Invokes text generation once under the destination output schema.
    /// An empty or malformed response is an error; there is no fallback.
    async fn generate_destination(
        &self,
        settings: &AdminSettings,
        input: &DestinationPromptInput,
    ) -> PortResult<DestinationDetails>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Requests a dual text+image response for the given prompt. `Ok(None)`
    /// means the model answered without usable media; the caller decides the
    /// fallback.
    async fn generate_image(
        &self,
        settings: &AdminSettings,
        prompt: &str,
    ) -> PortResult<Option<GeneratedMedia>>;
}

#[async_trait]
pub trait ConditionInterpretationService: Send + Sync {
    /// A plain text-modality call used for the daily-condition interpretation.
    async fn interpret(&self, settings: &AdminSettings, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait BlobStorageService: Send + Sync {
    /// Uploads a blob at `path` (bucket-qualified, e.g. "result-images/ai/x.png")
    /// and returns its public URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> PortResult<String>;
}

#[async_trait]
pub trait AuthTokenVerifier: Send + Sync {
    /// Resolves a bearer token to a user id, or `Unauthorized`.
    async fn verify(&self, bearer_token: &str) -> PortResult<String>;
}

#[async_trait]
pub trait GeoLocationService: Send + Sync {
    /// Resolves an IP address to a human-readable locale label; may be empty.
    async fn locate(&self, ip: &str) -> PortResult<String>;
}

#[async_trait]
pub trait AdminSettingsSource: Send + Sync {
    /// Fetches the current AI configuration and branding defaults.
    async fn fetch(&self) -> PortResult<AdminSettings>;
}
