//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the quiz/biorhythm/recommendation endpoints
//! and the master definition for the OpenAPI specification.

use crate::web::identity::client_ip;
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};
use wander_persona_core::biorhythm::{self, BiorhythmPercent, BiorhythmReading, ChartPoint};
use wander_persona_core::domain::RecommendationRequest;
use wander_persona_core::ports::PortError;
use wander_persona_core::prompt;
use wander_persona_core::quiz::{self, Question};

/// The single user-visible failure message for the fatal recommendation path.
pub const RECOMMEND_FAILURE_MESSAGE: &str =
    "추천 여행지를 가져오는 데 실패했습니다. 나중에 다시 시도해 주세요.";

/// Fixed interpretation pair served when the condition call cannot run.
const FALLBACK_INTERPRETATION: &str =
    "오늘은 신체리듬이 낮으니 휴식을 추천합니다. 내일은 더 활기찬 여행을 기대해보세요.";
const FALLBACK_SHORT_INTERPRETATION: &str = "휴식이 필요해요";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_quiz_questions_handler,
        biorhythm_handler,
        biorhythm_interpret_handler,
    ),
    components(
        schemas(QuizQuestionsResponse, BiorhythmQuery, InterpretPayload, InterpretResponse)
    ),
    tags(
        (name = "Wander Persona API", description = "API endpoints for the biorhythm travel recommender.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct QuizQuestionsResponse {
    #[schema(value_type = Vec<Object>)]
    questions: Vec<Question>,
}

#[derive(Deserialize, ToSchema)]
pub struct BiorhythmQuery {
    pub birth_date: NaiveDate,
    /// Defaults to today.
    pub target_date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct BiorhythmResponse {
    pub reading: BiorhythmReading,
    pub percent: BiorhythmPercent,
    pub chart: Vec<ChartPoint>,
}

#[derive(Deserialize, ToSchema)]
pub struct InterpretPayload {
    pub physical: i32,
    pub emotional: i32,
    pub intellectual: i32,
}

#[derive(Serialize, ToSchema)]
pub struct InterpretResponse {
    pub interpretation: String,
    #[serde(rename = "shortInterpretation")]
    pub short_interpretation: String,
}

impl InterpretResponse {
    fn fallback() -> Self {
        Self {
            interpretation: FALLBACK_INTERPRETATION.to_string(),
            short_interpretation: FALLBACK_SHORT_INTERPRETATION.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct RecommendPayload {
    pub birth_date: NaiveDate,
    pub quiz_answers: Vec<String>,
    /// Client-resolved departure label; resolved from `ip` when absent.
    pub location: Option<String>,
    pub ip: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Sample a fresh stratified question set for a new quiz session.
#[utoipa::path(
    post,
    path = "/api/generate-quiz-questions",
    responses(
        (status = 200, description = "A shuffled, stratified question subset", body = QuizQuestionsResponse)
    )
)]
pub async fn generate_quiz_questions_handler() -> impl IntoResponse {
    Json(QuizQuestionsResponse {
        questions: quiz::shuffled_questions(),
    })
}

/// Compute the biorhythm reading, percentages, and 29-day chart window.
#[utoipa::path(
    get,
    path = "/api/biorhythm",
    params(
        ("birth_date" = String, Query, description = "Birth date (YYYY-MM-DD)"),
        ("target_date" = Option<String>, Query, description = "Target date, defaults to today")
    ),
    responses(
        (status = 200, description = "The reading and its chart window")
    )
)]
pub async fn biorhythm_handler(Query(query): Query<BiorhythmQuery>) -> impl IntoResponse {
    let target = query.target_date.unwrap_or_else(|| Utc::now().date_naive());
    let reading = biorhythm::compute(query.birth_date, target);

    Json(BiorhythmResponse {
        reading,
        percent: reading.percent(),
        chart: biorhythm::chart_window(query.birth_date, target),
    })
}

/// Interpret today's travel condition from the biorhythm percentages.
///
/// This endpoint always answers 200: when settings or either model call fail,
/// the fixed fallback pair is returned instead.
#[utoipa::path(
    post,
    path = "/api/biorhythm-interpret",
    request_body = InterpretPayload,
    responses(
        (status = 200, description = "Interpretation pair (model-generated or fallback)", body = InterpretResponse)
    )
)]
pub async fn biorhythm_interpret_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<InterpretPayload>,
) -> impl IntoResponse {
    let settings = match app_state.settings.get().await {
        Ok(settings) => settings,
        Err(error) => {
            warn!(%error, "admin settings unavailable for interpretation, using fallback");
            return Json(InterpretResponse::fallback());
        }
    };

    let percent = BiorhythmPercent {
        physical: payload.physical,
        emotional: payload.emotional,
        intellectual: payload.intellectual,
    };

    let long = app_state
        .condition_adapter
        .interpret(&settings, &prompt::interpretation_prompt(&percent))
        .await;
    let short = app_state
        .condition_adapter
        .interpret(&settings, &prompt::short_interpretation_prompt(&percent))
        .await;

    match (long, short) {
        (Ok(interpretation), Ok(short_interpretation)) => Json(InterpretResponse {
            interpretation,
            short_interpretation,
        }),
        (long, short) => {
            warn!(
                long_failed = long.is_err(),
                short_failed = short.is_err(),
                "interpretation call failed, using fallback"
            );
            Json(InterpretResponse::fallback())
        }
    }
}

/// Run the full recommendation pipeline for a submitted quiz session.
pub async fn recommend_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<RecommendPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // The departure label: the client's own resolution wins; otherwise try a
    // geolocation lookup on the caller IP. Lookup failures degrade to empty.
    let location_label = match payload.location.filter(|label| !label.is_empty()) {
        Some(label) => label,
        None => {
            let ip = payload.ip.unwrap_or_else(|| client_ip(&headers));
            if ip.is_empty() || ip == "unknown" || ip == "::1" || ip == "127.0.0.1" {
                String::new()
            } else {
                match app_state.geo_adapter.locate(&ip).await {
                    Ok(label) => label,
                    Err(error) => {
                        warn!(%error, "geolocation failed, proceeding without a departure label");
                        String::new()
                    }
                }
            }
        }
    };

    let today = Utc::now().date_naive();
    let request = RecommendationRequest {
        birth_date: payload.birth_date,
        quiz_answers: payload.quiz_answers,
        biorhythm: biorhythm::compute(payload.birth_date, today),
        location_label,
    };

    match app_state.engine.recommend(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(error) => {
            error!("Failed to produce a recommendation: {:?}", error);
            let status = match error {
                PortError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            Err((status, RECOMMEND_FAILURE_MESSAGE.to_string()))
        }
    }
}
