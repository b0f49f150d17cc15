//! services/api/src/adapters/condition_llm.rs
//!
//! This module contains the adapter for the daily-condition interpretation
//! calls. It implements the `ConditionInterpretationService` port from the
//! `core` crate with a plain text-modality generateContent request.

use crate::adapters::gemini::{error_for_status, generate_content_url, GenerateContentResponse};
use async_trait::async_trait;
use serde_json::json;
use wander_persona_core::domain::AdminSettings;
use wander_persona_core::ports::{ConditionInterpretationService, PortError, PortResult};

/// Model used when the admin settings leave the text model blank.
const DEFAULT_TEXT_MODEL: &str = "googleai/gemini-2.0-flash";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ConditionInterpretationService` against a
/// generateContent-compatible model API.
#[derive(Clone)]
pub struct GeminiConditionAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiConditionAdapter {
    /// Creates a new `GeminiConditionAdapter`.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

//=========================================================================================
// `ConditionInterpretationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ConditionInterpretationService for GeminiConditionAdapter {
    async fn interpret(&self, settings: &AdminSettings, prompt: &str) -> PortResult<String> {
        let model = if settings.text_model.trim().is_empty() {
            DEFAULT_TEXT_MODEL
        } else {
            &settings.text_model
        };
        let url = generate_content_url(&self.base_url, model, &settings.text_model_api_key);

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["TEXT"] }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("interpretation request failed: {e}")))?;
        let response = error_for_status(response).await?;

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("unreadable model response: {e}")))?;

        payload
            .first_text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| PortError::Unexpected("interpretation returned no text".to_string()))
    }
}
