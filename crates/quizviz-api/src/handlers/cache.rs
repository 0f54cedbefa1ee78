//! Cache inspection endpoints

use axum::{extract::State, Json};
use tracing::info;

use crate::{models::CacheStatsResponse, state::AppState};

/// Cache statistics
#[utoipa::path(
    get,
    path = "/images/cache",
    responses(
        (status = 200, description = "Current cache statistics", body = CacheStatsResponse)
    )
)]
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.gateway.cache_stats().await;
    Json(CacheStatsResponse {
        entry_count: stats.entry_count,
        hits: stats.hits,
        misses: stats.misses,
        evictions: stats.evictions,
        hit_rate: stats.hit_rate(),
        oldest_entry: stats.oldest_entry,
    })
}

/// Clear the image cache
#[utoipa::path(
    delete,
    path = "/images/cache",
    responses(
        (status = 200, description = "Cache cleared", body = serde_json::Value)
    )
)]
pub async fn clear_cache(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.gateway.clear_cache().await;
    info!("image cache cleared via API");
    Json(serde_json::json!({ "success": true }))
}
