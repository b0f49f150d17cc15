//! services/api/src/web/likes.rs
//!
//! The like toggle, like status, and "other travelers" recommend list.

use crate::web::identity::{resolve_actor, resolve_user_id};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;
use wander_persona_core::domain::ActorKey;
use wander_persona_core::leaderboard::{rank_top_recommendations, ExclusionFilter};
use wander_persona_core::ports::LikeLookup;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LikePayload {
    pub destination: String,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct LikeResponse {
    pub success: bool,
    pub liked: bool,
    pub likes: i64,
    pub message: String,
}

#[derive(Deserialize)]
pub struct LikeStatusQuery {
    pub destination: String,
}

#[derive(Deserialize)]
pub struct RecommendListQuery {
    #[serde(rename = "excludeId")]
    pub exclude_id: Option<Uuid>,
    #[serde(rename = "excludeBirthDate")]
    pub exclude_birth_date: Option<NaiveDate>,
    #[serde(rename = "excludeEmail")]
    pub exclude_email: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Toggle today's like for a destination.
///
/// The actor is the authenticated user when a bearer token verifies, else the
/// caller IP; the same actor toggling twice on one calendar day flips
/// like → unlike.
#[utoipa::path(
    post,
    path = "/api/like-destination",
    request_body = LikePayload,
    responses(
        (status = 200, description = "The new like state", body = LikeResponse),
        (status = 400, description = "Missing destination"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn like_destination_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<LikePayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if payload.destination.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Destination is required".to_string()));
    }

    let actor = resolve_actor(&app_state, &headers).await;
    let lookup = LikeLookup {
        user_id: match &actor {
            ActorKey::User(user_id) => Some(user_id.clone()),
            ActorKey::Ip(_) => None,
        },
        email: payload.email,
        birth_date: payload.birth_date,
    };
    let today = Utc::now().date_naive();

    match app_state
        .db
        .toggle_like(&payload.destination, &lookup, &actor, today)
        .await
    {
        Ok(outcome) => Ok(Json(LikeResponse {
            success: true,
            liked: outcome.liked,
            likes: outcome.likes,
            message: if outcome.liked {
                "Like added successfully".to_string()
            } else {
                "Like removed successfully".to_string()
            },
        })),
        Err(e) => {
            error!("Failed to toggle like: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update likes".to_string(),
            ))
        }
    }
}

/// Report whether the caller already liked a destination today.
pub async fn like_status_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LikeStatusQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if query.destination.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Destination is required".to_string()));
    }

    let actor = resolve_actor(&app_state, &headers).await;
    let today = Utc::now().date_naive();

    match app_state
        .db
        .like_status(&query.destination, &actor, today)
        .await
    {
        Ok(status) => Ok(Json(status)),
        Err(e) => {
            error!("Failed to read like status: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ))
        }
    }
}

/// The like-ranked destination list, deduped and capped at fifteen entries.
pub async fn recommend_list_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RecommendListQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // The caller's own verified id also excludes their session row.
    let exclude_id = match query.exclude_id {
        Some(id) => Some(id),
        None => resolve_user_id(&app_state, &headers)
            .await
            .and_then(|id| Uuid::parse_str(&id).ok()),
    };

    let rows = match app_state.db.list_sessions_by_likes().await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to list sessions: {:?}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ));
        }
    };

    let filter = ExclusionFilter {
        id: exclude_id,
        birth_date: query.exclude_birth_date,
        email: query.exclude_email,
    };

    Ok(Json(rank_top_recommendations(rows, &filter)))
}
