//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use wander_persona_core::ports::{
    AuthTokenVerifier, BlobStorageService, ConditionInterpretationService, DatabaseService,
    GeoLocationService,
};
use wander_persona_core::recommend::RecommendationEngine;
use wander_persona_core::settings::SettingsCache;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseService>,
    pub settings: Arc<SettingsCache>,
    pub engine: Arc<RecommendationEngine>,
    pub condition_adapter: Arc<dyn ConditionInterpretationService>,
    pub storage_adapter: Arc<dyn BlobStorageService>,
    pub auth_adapter: Arc<dyn AuthTokenVerifier>,
    pub geo_adapter: Arc<dyn GeoLocationService>,
    /// Plain HTTP client for downloading externally hosted result images
    /// before they are re-uploaded into blob storage.
    pub http: reqwest::Client,
}
