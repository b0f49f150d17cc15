pub mod auth;
pub mod condition_llm;
pub mod db;
pub mod destination_llm;
pub mod gemini;
pub mod geo;
pub mod image_llm;
pub mod settings;
pub mod storage;

pub use auth::BearerAuthAdapter;
pub use condition_llm::GeminiConditionAdapter;
pub use db::DbAdapter;
pub use destination_llm::GeminiDestinationAdapter;
pub use geo::IpGeoAdapter;
pub use image_llm::GeminiImageAdapter;
pub use settings::EnvSettingsSource;
pub use storage::ObjectStorageAdapter;
