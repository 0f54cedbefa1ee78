//! The generation state machine
//!
//! `Gateway::generate` drives a request through cache lookup, in-flight
//! deduplication, provider attempts with a per-call deadline and backoff
//! between retries, and finally the rendered fallback. The public surface
//! is infallible: every path settles with a `GenerationResult`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, info, warn};

use quizviz_cache::{CacheConfig, CacheEntry, CacheStats, ImageCache};
use quizviz_providers::{
    compile_prompt, Category, GenerationRequest, GenerationResult, ImageContent, ImageProvider,
    ProviderDescriptor, ProviderError, Style,
};
use quizviz_render::{render, DiagramType, RenderOptions, RenderStyle};

use crate::backoff::ExponentialBackoff;
use crate::dedup::InFlightTable;

/// Name reported for results produced by the local renderer.
pub const FALLBACK_PROVIDER: &str = "fallback";

/// Orchestration settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Deadline for a single provider call
    pub provider_timeout: Duration,
    /// Attempts per provider before moving on
    pub max_attempts: u32,
    /// First retry delay
    pub base_delay: Duration,
    /// Retry delay ceiling
    pub max_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// The generation gateway.
pub struct Gateway {
    providers: Vec<Arc<dyn ImageProvider>>,
    cache: Arc<ImageCache>,
    in_flight: Arc<InFlightTable>,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(
        providers: Vec<Arc<dyn ImageProvider>>,
        cache_config: CacheConfig,
        config: GatewayConfig,
    ) -> Self {
        Self {
            providers,
            cache: Arc::new(ImageCache::new(cache_config)),
            in_flight: Arc::new(InFlightTable::new()),
            config,
        }
    }

    /// Generate an image for the request, going to a provider only when the
    /// cache misses and no identical request is already in flight.
    pub async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        let key = request.cache_key();

        if let Some(entry) = self.cache.get(&key).await {
            debug!(%key, "serving cached image");
            return GenerationResult::Success {
                content: ImageContent::Url(entry.content),
                provider: entry.provider,
                took_ms: 0,
            };
        }

        let providers = self.providers.clone();
        let cache = Arc::clone(&self.cache);
        let config = self.config.clone();
        self.in_flight
            .join_or_start(&key, run_generation(providers, cache, config, request))
            .await
    }

    /// Whether generation can only serve rendered fallbacks.
    pub fn fallback_only(&self) -> bool {
        self.providers.is_empty()
    }

    /// Descriptors of the configured providers in preference order.
    pub fn provider_descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers.iter().map(|p| p.descriptor()).collect()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    #[cfg(test)]
    pub(crate) async fn cache_len(&self) -> usize {
        self.cache.len().await
    }
}

/// One full generation: provider attempts, then the rendered fallback.
async fn run_generation(
    providers: Vec<Arc<dyn ImageProvider>>,
    cache: Arc<ImageCache>,
    config: GatewayConfig,
    request: GenerationRequest,
) -> GenerationResult {
    let started = Instant::now();
    let key = request.cache_key();

    for provider in &providers {
        let mut backoff = ExponentialBackoff::new(config.base_delay, config.max_delay);

        for attempt in 1..=config.max_attempts {
            let outcome = match timeout(config.provider_timeout, provider.generate(&request)).await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(config.provider_timeout)),
            };

            match outcome {
                Ok(content) => {
                    let took_ms = started.elapsed().as_millis() as u64;
                    store_success(&cache, &key, &request, &content, provider.id()).await;
                    info!(
                        provider = provider.id(),
                        %key, took_ms, "image generated"
                    );
                    return GenerationResult::Success {
                        content,
                        provider: provider.id().to_string(),
                        took_ms,
                    };
                }
                Err(err) => {
                    let class = err.class();
                    warn!(
                        provider = provider.id(),
                        %key,
                        attempt,
                        error_class = ?class,
                        "generation attempt failed: {err}"
                    );
                    if class.is_retryable() && attempt < config.max_attempts {
                        tokio::time::sleep(backoff.next_delay()).await;
                    } else {
                        // Terminal for this provider; try the next one
                        break;
                    }
                }
            }
        }
    }

    let took_ms = started.elapsed().as_millis() as u64;
    if providers.is_empty() {
        debug!(%key, "no providers configured, rendering fallback");
    } else {
        warn!(%key, "all providers exhausted, rendering fallback");
    }
    GenerationResult::Success {
        content: ImageContent::Svg(render_fallback(&request)),
        provider: FALLBACK_PROVIDER.to_string(),
        took_ms,
    }
}

/// Cache a provider success. Fallback results never pass through here.
async fn store_success(
    cache: &ImageCache,
    key: &str,
    request: &GenerationRequest,
    content: &ImageContent,
    provider: &str,
) {
    let prompt = compile_prompt(
        &request.description,
        request.resolved_category(),
        request.style,
    );
    cache
        .put(CacheEntry::new(
            key,
            content.as_url(),
            prompt.positive,
            request.style.as_str(),
            provider,
        ))
        .await;
}

/// Render the deterministic local diagram for a request.
fn render_fallback(request: &GenerationRequest) -> String {
    let diagram_type = match request.resolved_category() {
        Category::Matrix => DiagramType::Matrix,
        Category::Cube => DiagramType::ThreeDShapes,
        Category::Spatial => DiagramType::CrossSection,
        Category::Geometric => DiagramType::Geometric,
        Category::Pattern | Category::Numerical | Category::Logical => DiagramType::Patterns,
    };
    let options = RenderOptions {
        style: match request.style {
            Style::Minimal => RenderStyle::Minimal,
            Style::Detailed => RenderStyle::Detailed,
            Style::Abstract => RenderStyle::Abstract,
            Style::Geometric => RenderStyle::Geometric,
        },
        ..Default::default()
    };
    render(&request.description, diagram_type, &options)
}

#[cfg(test)]
mod tests {
    use quizviz_providers::QualityTier;

    use super::*;

    fn request(id: &str) -> GenerationRequest {
        GenerationRequest {
            question_id: id.into(),
            description: "a 3x3 matrix of shapes".into(),
            category: None,
            style: Style::Minimal,
            quality: QualityTier::Standard,
        }
    }

    #[tokio::test]
    async fn test_no_providers_yields_rendered_fallback() {
        let gateway = Gateway::new(vec![], CacheConfig::default(), GatewayConfig::default());
        assert!(gateway.fallback_only());

        match gateway.generate(request("q1")).await {
            GenerationResult::Success {
                content: ImageContent::Svg(markup),
                provider,
                ..
            } => {
                assert_eq!(provider, FALLBACK_PROVIDER);
                assert!(markup.starts_with("<svg"));
            }
            other => panic!("expected rendered fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fallback_results_are_not_cached() {
        let gateway = Gateway::new(vec![], CacheConfig::default(), GatewayConfig::default());
        gateway.generate(request("q1")).await;
        gateway.generate(request("q1")).await;
        assert_eq!(gateway.cache_len().await, 0);
    }

    #[tokio::test]
    async fn test_fallback_diagram_matches_category() {
        let gateway = Gateway::new(vec![], CacheConfig::default(), GatewayConfig::default());
        let result = gateway.generate(request("q-matrix")).await;
        match result {
            GenerationResult::Success {
                content: ImageContent::Svg(markup),
                ..
            } => assert!(markup.contains(">?</text>")),
            other => panic!("expected svg, got {other:?}"),
        }
    }
}
