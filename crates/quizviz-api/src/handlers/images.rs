//! Image generation endpoints

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use chrono::Utc;
use tokio::time::timeout;
use tracing::debug;

use quizviz_providers::{compile_prompt, GenerationRequest, GenerationResult};

use crate::{
    error::{ApiError, ApiResult},
    models::{GenerateImageQuery, GenerateImageRequest, GenerateImageResponse},
    state::AppState,
};

/// Overall deadline for a generation request at the boundary
const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

/// Generate an image for a quiz question
#[utoipa::path(
    post,
    path = "/images/generate",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Image generated", body = GenerateImageResponse),
        (status = 400, description = "Invalid request"),
        (status = 504, description = "Generation timed out")
    )
)]
pub async fn generate_image(
    State(state): State<AppState>,
    Json(body): Json<GenerateImageRequest>,
) -> ApiResult<(HeaderMap, Json<GenerateImageResponse>)> {
    let request = body.validate()?;
    run(state, request).await
}

/// Generate an image from query parameters
#[utoipa::path(
    get,
    path = "/images/generate",
    params(GenerateImageQuery),
    responses(
        (status = 200, description = "Image generated", body = GenerateImageResponse),
        (status = 400, description = "Invalid request"),
        (status = 504, description = "Generation timed out")
    )
)]
pub async fn generate_image_query(
    State(state): State<AppState>,
    Query(query): Query<GenerateImageQuery>,
) -> ApiResult<(HeaderMap, Json<GenerateImageResponse>)> {
    let request = query.validate()?;
    run(state, request).await
}

async fn run(
    state: AppState,
    request: GenerationRequest,
) -> ApiResult<(HeaderMap, Json<GenerateImageResponse>)> {
    debug!(question_id = %request.question_id, "generation requested");

    let prompt = compile_prompt(
        &request.description,
        request.resolved_category(),
        request.style,
    );
    let style = request.style.as_str().to_string();

    let result = timeout(REQUEST_DEADLINE, state.gateway.generate(request))
        .await
        .map_err(|_| ApiError::Timeout)?;

    match result {
        GenerationResult::Success {
            content, provider, ..
        } => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=3600"),
            );
            Ok((
                headers,
                Json(GenerateImageResponse {
                    success: true,
                    image_url: content.as_url(),
                    generated_at: Utc::now(),
                    prompt: prompt.positive,
                    style,
                    provider,
                }),
            ))
        }
        GenerationResult::Failure {
            error_class,
            message,
            ..
        } => Err(ApiError::GenerationFailed {
            error_class,
            message,
        }),
    }
}
