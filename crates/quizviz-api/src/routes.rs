//! API route definitions

use axum::{
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers::{cache, health, images},
    middleware::security_headers,
    state::AppState,
};

/// API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Image generation
        .route("/images/generate", post(images::generate_image))
        .route("/images/generate", get(images::generate_image_query))
        // Cache inspection
        .route("/images/cache", get(cache::cache_stats))
        .route("/images/cache", delete(cache::clear_cache))
        // Layers
        .layer(from_fn(security_headers))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Swagger UI routes
pub fn swagger_routes() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Combined routes
pub fn all_routes() -> Router<AppState> {
    api_routes().merge(swagger_routes())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        images::generate_image,
        images::generate_image_query,
        cache::cache_stats,
        cache::clear_cache,
    ),
    components(schemas(
        crate::models::GenerateImageRequest,
        crate::models::GenerateImageResponse,
        crate::models::CacheStatsResponse,
        crate::models::HealthResponse,
    )),
    info(
        title = "QuizViz API",
        version = "1.0.0",
        description = "Image generation gateway for quiz question visuals"
    )
)]
struct ApiDoc;
