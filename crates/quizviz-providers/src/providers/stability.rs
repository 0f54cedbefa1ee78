//! Stability AI provider
//!
//! Text-to-image via the Stability generation API. Responses carry the
//! image as base64, which the adapter turns into a `data:` URL so the rest
//! of the pipeline never handles raw bytes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ProviderError;
use crate::models::{
    Category, GenerationRequest, ImageContent, ModelInfo, ProviderDescriptor, QualityTier,
};
use crate::prompt::compile_prompt;
use crate::provider::ImageProvider;
use crate::selection::{resolution_for, select_model};

const DEFAULT_BASE_URL: &str = "https://api.stability.ai";
const CFG_SCALE: f64 = 7.0;
const STEPS: u32 = 30;

/// Stability AI adapter.
pub struct StabilityProvider {
    api_key: String,
    client: Client,
    base_url: String,
}

impl StabilityProvider {
    /// Create a new adapter. The key must be non-empty.
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create an adapter pointed at a custom base URL.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        if api_key.is_empty() {
            return Err(ProviderError::ConfigError(
                "Stability API key is required".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            client: Client::new(),
            base_url,
        })
    }

    /// Cost in USD of generating `count` images with the given model.
    pub fn calculate_cost(model: &ModelInfo, count: u64) -> f64 {
        model.cost_per_image * count as f64
    }

    /// Projected monthly cost for a daily generation volume.
    pub fn estimate_monthly_cost(model: &ModelInfo, images_per_day: u64) -> f64 {
        Self::calculate_cost(model, images_per_day * 30)
    }
}

#[async_trait]
impl ImageProvider for StabilityProvider {
    fn id(&self) -> &str {
        "stability"
    }

    fn name(&self) -> &str {
        "Stability AI"
    }

    fn descriptor(&self) -> ProviderDescriptor {
        let models = [
            (Category::Pattern, QualityTier::High),
            (Category::Pattern, QualityTier::Standard),
            (Category::Matrix, QualityTier::Standard),
            (Category::Spatial, QualityTier::High),
            (Category::Logical, QualityTier::Standard),
            (Category::Logical, QualityTier::Draft),
        ]
        .into_iter()
        .map(|(category, quality)| select_model(category, quality))
        .collect();

        ProviderDescriptor {
            id: self.id().to_string(),
            name: self.name().to_string(),
            models,
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ImageContent, ProviderError> {
        let category = request.resolved_category();
        let model = select_model(category, request.quality);
        let resolution = resolution_for(&model);
        let prompt = compile_prompt(&request.description, category, request.style);

        let body = TextToImageRequest {
            text_prompts: vec![
                TextPrompt {
                    text: prompt.positive,
                    weight: 1.0,
                },
                TextPrompt {
                    text: prompt.negative,
                    weight: -1.0,
                },
            ],
            cfg_scale: CFG_SCALE,
            steps: STEPS,
            width: resolution.width,
            height: resolution.height,
            samples: 1,
        };

        debug!(model = %model.id, question_id = %request.question_id, "requesting image from Stability");

        let response = self
            .client
            .post(format!(
                "{}/v1/generation/{}/text-to-image",
                self.base_url, model.id
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Stability request failed: {e}");
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(%status, "Stability API error: {message}");
            return Err(ProviderError::from_status(status.as_u16(), message));
        }

        let parsed: TextToImageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let artifact = parsed
            .artifacts
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("no artifacts in response".into()))?;

        Ok(ImageContent::Url(format!(
            "data:image/png;base64,{}",
            artifact.base64
        )))
    }
}

#[derive(Debug, Serialize)]
struct TextToImageRequest {
    text_prompts: Vec<TextPrompt>,
    cfg_scale: f64,
    steps: u32,
    width: u32,
    height: u32,
    samples: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt {
    text: String,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: String,
}
