//! services/api/src/web/sessions.rs
//!
//! Persists finished recommendation sessions and serves them back. Saving is
//! the sequential step after a successful recommendation: resolve the
//! departure label, move the generated image into durable storage, extract
//! the destination key, insert the row.

use crate::web::identity::client_ip;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use base64::Engine;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;
use wander_persona_core::domain::StoredSession;
use wander_persona_core::leaderboard::PLACEHOLDER_DESTINATION;

/// Departure label stored when nothing could be resolved.
const LOCAL_LOCATION: &str = "local";

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize)]
pub struct SaveSessionPayload {
    pub email: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub quiz_answers: Vec<String>,
    /// The full recommendation result as returned to the client.
    pub ai_result: Value,
    pub image_url: Option<String>,
    pub ip: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct SaveSessionResponse {
    pub success: bool,
}

#[derive(Deserialize)]
pub struct UpdateSessionImagePayload {
    pub email: String,
    pub image_url: String,
}

//=========================================================================================
// Image Persistence Helpers
//=========================================================================================

/// Moves a remote or data-URI image into blob storage under a fresh uuid key,
/// returning the public URL. Any failure keeps the original URL; the save
/// must not fail because of image plumbing.
async fn persist_image(app_state: &AppState, image_url: String) -> String {
    let file_name = format!("result-images/ai/{}.png", Uuid::new_v4());

    let bytes = if image_url.starts_with("http://") || image_url.starts_with("https://") {
        match download_image(app_state, &image_url).await {
            Ok(bytes) => bytes,
            Err(message) => {
                warn!(%message, "image download failed, keeping the original URL");
                return image_url;
            }
        }
    } else if let Some(encoded) = image_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, data)| data)
    {
        match base64::engine::general_purpose::STANDARD.decode(encoded) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "image data URI did not decode, keeping the original URL");
                return image_url;
            }
        }
    } else {
        // Already a local path (e.g. the placeholder); nothing to persist.
        return image_url;
    };

    match app_state
        .storage_adapter
        .upload(&file_name, bytes, "image/png")
        .await
    {
        Ok(public_url) => public_url,
        Err(error) => {
            warn!(%error, "image upload failed, keeping the original URL");
            image_url
        }
    }
}

async fn download_image(app_state: &AppState, url: &str) -> Result<Vec<u8>, String> {
    let response = app_state
        .http
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("download returned {}", response.status()));
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

/// Pulls the destination key out of the stored result JSON.
fn extract_destination(ai_result: &Value) -> String {
    ai_result
        .get("destinationName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(PLACEHOLDER_DESTINATION)
        .to_string()
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Save a finished quiz session with its recommendation result.
pub async fn save_session_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SaveSessionPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let ip = payload.ip.unwrap_or_else(|| client_ip(&headers));

    let location = match payload.location.filter(|label| !label.is_empty()) {
        Some(label) => label,
        None if ip != "unknown" && ip != "::1" && ip != "127.0.0.1" => {
            match app_state.geo_adapter.locate(&ip).await {
                Ok(label) if !label.is_empty() => label,
                Ok(_) => LOCAL_LOCATION.to_string(),
                Err(error) => {
                    warn!(%error, "geolocation failed during save, storing 'local'");
                    LOCAL_LOCATION.to_string()
                }
            }
        }
        None => LOCAL_LOCATION.to_string(),
    };

    let image_url = match payload.image_url {
        Some(url) if !url.is_empty() => Some(persist_image(&app_state, url).await),
        other => other,
    };

    let session = StoredSession {
        id: Uuid::new_v4(),
        email: payload.email,
        birth_date: payload.birth_date,
        quiz_answers: payload.quiz_answers,
        recommended_destination: extract_destination(&payload.ai_result),
        ai_result: payload.ai_result,
        image_url,
        ip: Some(ip),
        location: Some(location),
        likes: 0,
        liked_by: Vec::new(),
        created_at: Utc::now(),
    };

    match app_state.db.insert_session(session).await {
        Ok(()) => Ok(Json(SaveSessionResponse { success: true })),
        Err(e) => {
            error!("Failed to save session: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save session".to_string(),
            ))
        }
    }
}

/// Fetch one stored session by id.
pub async fn get_session_detail_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.db.get_session_by_id(session_id).await {
        Ok(session) => Ok(Json(session)),
        Err(e) => {
            error!("Failed to load session {}: {:?}", session_id, e);
            Err((StatusCode::NOT_FOUND, "Not found".to_string()))
        }
    }
}

/// Rewrite the stored image URL for the session matching an email.
pub async fn update_session_image_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UpdateSessionImagePayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state
        .db
        .update_session_image_by_email(&payload.email, &payload.image_url)
        .await
    {
        Ok(()) => Ok(Json(SaveSessionResponse { success: true })),
        Err(e) => {
            error!("Failed to update session image: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update session image".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn destination_extraction_falls_back_to_the_placeholder() {
        assert_eq!(
            extract_destination(&json!({ "destinationName": "전라남도 담양" })),
            "전라남도 담양"
        );
        assert_eq!(extract_destination(&json!({ "destinationName": "" })), "unknown");
        assert_eq!(extract_destination(&json!({})), "unknown");
        assert_eq!(extract_destination(&json!(null)), "unknown");
    }
}
