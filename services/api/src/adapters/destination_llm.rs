//! services/api/src/adapters/destination_llm.rs
//!
//! This module contains the adapter for the destination-recommendation LLM.
//! It implements the `DestinationGenerationService` port from the `core` crate,
//! invoking the generateContent API in JSON mode so the response is forced
//! into the destination output schema.

use crate::adapters::gemini::{error_for_status, generate_content_url, GenerateContentResponse};
use async_trait::async_trait;
use serde_json::json;
use wander_persona_core::domain::{AdminSettings, DestinationDetails};
use wander_persona_core::ports::{DestinationGenerationService, PortError, PortResult};
use wander_persona_core::prompt::{
    self, DestinationPromptInput, TEMPERATURE, TOP_P,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `DestinationGenerationService` against a
/// generateContent-compatible model API.
#[derive(Clone)]
pub struct GeminiDestinationAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiDestinationAdapter {
    /// Creates a new `GeminiDestinationAdapter`.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

//=========================================================================================
// `DestinationGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DestinationGenerationService for GeminiDestinationAdapter {
    /// Runs the single structured text-generation call. There is no retry and
    /// no fallback: destination quality is the product's core value, so a
    /// failure here must surface to the user.
    async fn generate_destination(
        &self,
        settings: &AdminSettings,
        input: &DestinationPromptInput,
    ) -> PortResult<DestinationDetails> {
        let url = generate_content_url(
            &self.base_url,
            &settings.text_model,
            &settings.text_model_api_key,
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt::destination_prompt(input) }] }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "topP": TOP_P,
                "responseMimeType": "application/json",
                "responseSchema": prompt::destination_response_schema(),
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("text generation request failed: {e}")))?;
        let response = error_for_status(response).await?;

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("unreadable model response: {e}")))?;

        let text = payload.first_text().ok_or_else(|| {
            PortError::Unexpected("text generation returned no output".to_string())
        })?;

        // The model was asked for schema-conforming JSON; anything that does
        // not parse into the typed shape is a schema violation, not a bug in
        // this adapter.
        serde_json::from_str::<DestinationDetails>(&text)
            .map_err(|e| PortError::SchemaViolation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_conforming_output_parses_into_details() {
        let raw = r#"{
            "personaTitle": "감성 힐링가",
            "destinationName": "전라남도 담양",
            "analysis": "대나무 숲이 인상적인 고장입니다.",
            "recommendations": [
                {"type": "숙소", "name": "담양 한옥스테이", "description": "고즈넉한 한옥", "address": "담양군 담양읍 1", "preferenceScore": 0.91},
                {"type": "맛집", "name": "담양국수거리", "description": "대통밥", "address": "담양군 담양읍 2"},
                {"type": "명소", "name": "죽녹원", "description": "대나무숲", "address": "담양군 담양읍 3"}
            ],
            "budget": "숙박: 120,000원\n총 1박 기준: 180,000원",
            "transport": "비행: 해당 없음\n시내: 시외버스",
            "tip": "아침 일찍 방문하세요.",
            "imagePrompt": "A cinematic photo of Juknokwon bamboo forest",
            "popularity": "Tripadvisor 4.6/5"
        }"#;

        let details: DestinationDetails = serde_json::from_str(raw).unwrap();
        assert_eq!(details.destination_name, "전라남도 담양");
        assert_eq!(details.recommendations.len(), 3);
        assert_eq!(details.recommendations[1].description, "대통밥");
    }

    #[test]
    fn unknown_recommendation_kind_fails_to_parse() {
        let raw = r#"{"type": "카페", "name": "x", "address": "y"}"#;
        assert!(serde_json::from_str::<wander_persona_core::domain::Recommendation>(raw).is_err());
    }
}
