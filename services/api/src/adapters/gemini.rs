//! services/api/src/adapters/gemini.rs
//!
//! Shared wire types and helpers for the generateContent-compatible
//! generative-model API consumed by the three model adapters.

use serde::Deserialize;
use wander_persona_core::ports::{PortError, PortResult};

/// Model ids may arrive with a registry prefix ("googleai/gemini-2.0-flash");
/// the REST endpoint wants the bare model name.
pub fn bare_model_name(model: &str) -> &str {
    model.strip_prefix("googleai/").unwrap_or(model)
}

/// Builds the generateContent endpoint URL for a model/key pair.
pub fn generate_content_url(base_url: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        base_url.trim_end_matches('/'),
        bare_model_name(model),
        api_key
    )
}

//=========================================================================================
// Response Wire Types
//=========================================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
    pub file_data: Option<FileData>,
}

/// Base64-encoded media returned inline with its mime type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Media referenced by URI instead of inline bytes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
    }

    /// The concatenated text of the first candidate, if any.
    pub fn first_text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// The first usable media URL: inline data becomes a data URI, file data
    /// passes its URI through.
    pub fn first_media_url(&self) -> Option<String> {
        for part in self.parts() {
            if let Some(inline) = &part.inline_data {
                return Some(format!("data:{};base64,{}", inline.mime_type, inline.data));
            }
            if let Some(file) = &part.file_data {
                return Some(file.file_uri.clone());
            }
        }
        None
    }
}

/// Maps a non-success HTTP status into a port error with the response body
/// attached for diagnosis.
pub async fn error_for_status(response: reqwest::Response) -> PortResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PortError::Unexpected(format!(
        "model API returned {}: {}",
        status,
        body.chars().take(300).collect::<String>()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_prefix_is_stripped() {
        assert_eq!(bare_model_name("googleai/gemini-2.0-flash"), "gemini-2.0-flash");
        assert_eq!(bare_model_name("gemini-2.0-flash"), "gemini-2.0-flash");
    }

    #[test]
    fn text_extraction_joins_candidate_parts() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"안녕"},{"text":"하세요"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.first_text().unwrap(), "안녕하세요");
    }

    #[test]
    fn whitespace_only_text_counts_as_empty() {
        let payload: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  \n"}]}}]}"#)
                .unwrap();
        assert!(payload.first_text().is_none());
    }

    #[test]
    fn inline_media_becomes_a_data_uri() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here is your image."},
                {"inlineData":{"mimeType":"image/png","data":"QUJD"}}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            payload.first_media_url().unwrap(),
            "data:image/png;base64,QUJD"
        );
    }

    #[test]
    fn text_only_responses_have_no_media() {
        let payload: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"no image"}]}}]}"#)
                .unwrap();
        assert!(payload.first_media_url().is_none());
    }
}
