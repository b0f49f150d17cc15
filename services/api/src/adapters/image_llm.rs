//! services/api/src/adapters/image_llm.rs
//!
//! This module contains the adapter for the image-generation model.
//! It implements the `ImageGenerationService` port from the `core` crate,
//! requesting a dual TEXT+IMAGE response and mapping inline media to a data
//! URI the rest of the pipeline can persist.

use crate::adapters::gemini::{error_for_status, generate_content_url, GenerateContentResponse};
use async_trait::async_trait;
use serde_json::json;
use wander_persona_core::domain::{AdminSettings, GeneratedMedia};
use wander_persona_core::ports::{ImageGenerationService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ImageGenerationService` against a
/// generateContent-compatible model API.
#[derive(Clone)]
pub struct GeminiImageAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiImageAdapter {
    /// Creates a new `GeminiImageAdapter`.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

//=========================================================================================
// `ImageGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageGenerationService for GeminiImageAdapter {
    /// Generates one image for the prompt. Errors and empty responses are
    /// both legitimate outcomes here — the orchestrator substitutes the
    /// placeholder either way, so this adapter never fabricates media.
    async fn generate_image(
        &self,
        settings: &AdminSettings,
        prompt: &str,
    ) -> PortResult<Option<GeneratedMedia>> {
        if settings.image_model.trim().is_empty() {
            return Ok(None);
        }

        // The image model may carry its own key; fall back to the text key.
        let api_key = if settings.image_model_api_key.is_empty() {
            &settings.text_model_api_key
        } else {
            &settings.image_model_api_key
        };
        let url = generate_content_url(&self.base_url, &settings.image_model, api_key);

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                // The image models reject single-modality requests.
                "responseModalities": ["TEXT", "IMAGE"],
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("image generation request failed: {e}")))?;
        let response = error_for_status(response).await?;

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("unreadable model response: {e}")))?;

        Ok(payload.first_media_url().map(|url| GeneratedMedia { url }))
    }
}
