//! Client for the image generation gateway
//!
//! A thin typed wrapper over the gateway's HTTP API with its own retry
//! policy. The client retries a narrower set of failures than the gateway
//! does internally: only timeouts, transient network errors, and 5xx
//! responses. Rate limiting and rejections are terminal here, since the
//! gateway has already done its own retrying before answering.

pub mod client;
pub mod config;
pub mod error;

pub use client::{GatewayClient, GenerateParams, GenerationResponse};
pub use config::ClientConfig;
pub use error::ClientError;
