//! services/api/src/adapters/settings.rs
//!
//! This module contains the environment-backed admin-settings source feeding
//! the core `SettingsCache`. Variables are read at fetch time (not captured
//! at startup) so a cache invalidation after an admin change picks up fresh
//! values without a restart.

use async_trait::async_trait;
use wander_persona_core::domain::AdminSettings;
use wander_persona_core::ports::{AdminSettingsSource, PortResult};

fn env_or_default(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An `AdminSettingsSource` reading the AI model/key and branding defaults
/// from process environment variables.
#[derive(Clone, Default)]
pub struct EnvSettingsSource;

impl EnvSettingsSource {
    pub fn new() -> Self {
        Self
    }
}

//=========================================================================================
// `AdminSettingsSource` Trait Implementation
//=========================================================================================

#[async_trait]
impl AdminSettingsSource for EnvSettingsSource {
    async fn fetch(&self) -> PortResult<AdminSettings> {
        let text_model_api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .unwrap_or_default();

        Ok(AdminSettings {
            text_model: env_or_default("TEXT_MODEL"),
            text_model_api_key,
            image_model: env_or_default("IMAGE_MODEL"),
            image_model_api_key: env_or_default("IMAGE_API_KEY"),
            title: env_or_default("ADMIN_TITLE"),
            image_url: env_or_default("ADMIN_IMAGE_URL"),
        })
    }
}
