//! HTTP API for the image generation gateway
//!
//! Exposes generation, cache inspection, and health endpoints over axum,
//! with OpenAPI documentation served at `/swagger-ui`.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::all_routes;
pub use state::AppState;
