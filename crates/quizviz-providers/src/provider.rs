//! The provider trait

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{GenerationRequest, ImageContent, ProviderDescriptor};

/// A backend capable of generating an image for a request.
///
/// Implementations perform one attempt per call; retries, deadlines, and
/// fallback are the orchestrator's responsibility.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Stable provider id (e.g. `stability`)
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Static description of the provider and its models
    fn descriptor(&self) -> ProviderDescriptor;

    /// Generate an image for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageContent, ProviderError>;
}
