//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        BearerAuthAdapter, DbAdapter, EnvSettingsSource, GeminiConditionAdapter,
        GeminiDestinationAdapter, GeminiImageAdapter, IpGeoAdapter, ObjectStorageAdapter,
    },
    config::Config,
    error::ApiError,
    web::{
        biorhythm_handler, biorhythm_interpret_handler, generate_quiz_questions_handler,
        get_admin_settings_handler, get_session_detail_handler, like_destination_handler,
        like_status_handler, middleware::require_auth, recommend_handler, recommend_list_handler,
        rest::ApiDoc, save_session_handler, state::AppState, update_admin_settings_handler,
        update_session_image_handler, upload_image_handler,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wander_persona_core::recommend::RecommendationEngine;
use wander_persona_core::settings::{SettingsCache, SystemClock};

/// The generation calls can legitimately take a while; everything else is a
/// quick lookup. Both stay bounded so a hung upstream cannot wedge a session.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter
        .run_migrations()
        .await
        .map_err(|e| ApiError::Internal(format!("migration failed: {e}")))?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let generation_client = reqwest::Client::builder()
        .timeout(GENERATION_TIMEOUT)
        .build()?;
    let lookup_client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;

    let settings_cache = Arc::new(SettingsCache::new(
        Arc::new(EnvSettingsSource::new()),
        Arc::new(SystemClock),
    ));

    let destination_adapter = Arc::new(GeminiDestinationAdapter::new(
        generation_client.clone(),
        config.genai_base_url.clone(),
    ));
    let image_adapter = Arc::new(GeminiImageAdapter::new(
        generation_client.clone(),
        config.genai_base_url.clone(),
    ));
    let condition_adapter = Arc::new(GeminiConditionAdapter::new(
        generation_client.clone(),
        config.genai_base_url.clone(),
    ));

    let storage_adapter = Arc::new(ObjectStorageAdapter::new(
        lookup_client.clone(),
        config.storage_url.clone(),
        config.storage_service_key.clone(),
    ));
    let auth_adapter = Arc::new(BearerAuthAdapter::new(
        lookup_client.clone(),
        config.storage_url.clone(),
        config.auth_api_key.clone(),
    ));
    let geo_adapter = Arc::new(IpGeoAdapter::new(
        lookup_client.clone(),
        config.geo_api_url.clone(),
    ));

    let engine = Arc::new(RecommendationEngine::new(
        settings_cache.clone(),
        destination_adapter,
        image_adapter,
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        db: db_adapter,
        settings: settings_cache,
        engine,
        condition_adapter,
        storage_adapter,
        auth_adapter,
        geo_adapter,
        http: generation_client,
    });

    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(
            config
                .allowed_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("invalid ALLOWED_ORIGIN: {e}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/generate-quiz-questions", post(generate_quiz_questions_handler))
        .route("/api/biorhythm", get(biorhythm_handler))
        .route("/api/biorhythm-interpret", post(biorhythm_interpret_handler))
        .route("/api/recommend", post(recommend_handler))
        .route("/api/save-quiz-result-session", post(save_session_handler))
        .route("/api/get-session-detail/{session_id}", get(get_session_detail_handler))
        .route("/api/update-session-image", post(update_session_image_handler))
        .route(
            "/api/like-destination",
            post(like_destination_handler).get(like_status_handler),
        )
        .route("/api/get-recommend-list", get(recommend_list_handler))
        .route("/api/admin-settings", get(get_admin_settings_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/update-admin-settings", post(update_admin_settings_handler))
        .route("/api/upload-image", post(upload_image_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
