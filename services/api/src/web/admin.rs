//! services/api/src/web/admin.rs
//!
//! Admin settings and branding endpoints. Reads merge the env-backed AI
//! settings with the newest branding row; writes insert a branding row and
//! invalidate the settings cache.

use crate::adapters::storage::BRANDING_IMAGE_BUCKET;
use crate::web::middleware::AuthUserId;
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use wander_persona_core::domain::{AdminSettings, Branding};

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct UpdateBrandingPayload {
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateBrandingResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct UploadImageResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Current admin settings: cached AI configuration with the newest branding
/// row layered over the env defaults.
pub async fn get_admin_settings_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let settings = app_state.settings.get().await.map_err(|e| {
        error!("Failed to load admin settings: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load admin settings".to_string(),
        )
    })?;

    let branding = app_state.db.latest_branding().await.map_err(|e| {
        error!("Failed to load branding: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load branding".to_string(),
        )
    })?;

    let merged = match branding {
        Some(branding) => AdminSettings {
            title: if branding.title.is_empty() {
                settings.title
            } else {
                branding.title
            },
            image_url: if branding.image_url.is_empty() {
                settings.image_url
            } else {
                branding.image_url
            },
            ..settings
        },
        None => settings,
    };

    Ok(Json(merged))
}

/// Store a new branding record and drop the cached settings.
pub async fn update_admin_settings_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Json(payload): Json<UpdateBrandingPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let branding = Branding {
        title: payload.title,
        image_url: payload.image_url,
        created_at: Utc::now(),
    };

    app_state.db.insert_branding(branding).await.map_err(|e| {
        error!("Failed to save branding (admin {}): {:?}", user_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save branding".to_string(),
        )
    })?;

    app_state.settings.invalidate();

    Ok(Json(UpdateBrandingResponse { success: true }))
}

/// Upload a branding image. Only `.jpg`/`.jpeg` files are accepted; the blob
/// lands at a fixed per-admin path so re-uploads replace the previous image.
pub async fn upload_image_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name == "file" || field_name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to read file bytes: {}", e),
                )
            })?;
            file = Some((file_name, data.to_vec()));
            break;
        }
    }

    let (file_name, bytes) =
        file.ok_or((StatusCode::BAD_REQUEST, "No file uploaded".to_string()))?;

    let lowered = file_name.to_lowercase();
    if !lowered.ends_with(".jpg") && !lowered.ends_with(".jpeg") {
        return Err((
            StatusCode::BAD_REQUEST,
            "jpg 파일만 업로드할 수 있습니다.".to_string(),
        ));
    }

    let path = format!("{}/public/{}/image.jpg", BRANDING_IMAGE_BUCKET, user_id);
    let image_url = app_state
        .storage_adapter
        .upload(&path, bytes, "image/jpeg")
        .await
        .map_err(|e| {
            error!("Failed to upload branding image: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upload image".to_string(),
            )
        })?;

    Ok(Json(UploadImageResponse { image_url }))
}
