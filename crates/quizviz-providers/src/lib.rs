//! Image generation providers for quiz visuals
//!
//! This crate owns everything between a visual request and a provider's
//! HTTP API: the error taxonomy, request/result models, prompt compilation,
//! per-category model selection, and the adapters themselves. Providers are
//! exposed behind the [`ImageProvider`] trait so the orchestration layer
//! never depends on a concrete vendor.

pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod selection;

pub use config::ProvidersConfig;
pub use error::{ErrorClass, ProviderError};
pub use models::{
    Category, GenerationRequest, GenerationResult, ImageContent, ModelInfo, ProviderDescriptor,
    QualityTier, Style,
};
pub use prompt::{compile_prompt, CompiledPrompt};
pub use provider::ImageProvider;
pub use providers::{ImagineProvider, StabilityProvider};
pub use selection::{select_model, Resolution};
