//! Request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use quizviz_providers::{Category, QualityTier, Style};

use crate::error::ApiError;

const MAX_PROMPT_LEN: usize = 2000;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Body of `POST /images/generate`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    /// Stable question identity for caching. Optional at the serde level
    /// so an absent field reaches validation and answers 400, not 422.
    #[serde(default)]
    pub question_id: Option<String>,
    /// What the image should depict
    #[serde(default)]
    pub prompt: Option<String>,
    /// Visual style (`minimal`, `detailed`, `abstract`, `geometric`)
    pub style: Option<String>,
    /// Quality tier (`draft`, `standard`, `high`)
    pub quality: Option<String>,
    /// Question category; inferred from the prompt when absent
    pub category: Option<String>,
}

impl GenerateImageRequest {
    /// Validate the body and build the internal generation request.
    pub fn validate(self) -> Result<quizviz_providers::GenerationRequest, ApiError> {
        let question_id = self
            .question_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("questionId is required".into()))?;
        let prompt = self
            .prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("prompt is required".into()))?;
        if prompt.len() > MAX_PROMPT_LEN {
            return Err(ApiError::BadRequest(format!(
                "prompt exceeds {MAX_PROMPT_LEN} characters"
            )));
        }

        Ok(quizviz_providers::GenerationRequest {
            question_id,
            description: prompt,
            category: self.category.as_deref().map(Category::from_str_lossy),
            style: parse_style(self.style.as_deref()),
            quality: parse_quality(self.quality.as_deref()),
        })
    }
}

/// Query parameters of `GET /images/generate`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageQuery {
    pub question_id: String,
    pub category: Option<String>,
    pub description: String,
    pub style: Option<String>,
}

impl GenerateImageQuery {
    pub fn validate(self) -> Result<quizviz_providers::GenerationRequest, ApiError> {
        if self.question_id.trim().is_empty() {
            return Err(ApiError::BadRequest("questionId is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::BadRequest("description is required".into()));
        }
        if self.description.len() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::BadRequest(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(quizviz_providers::GenerationRequest {
            question_id: self.question_id,
            description: self.description,
            category: self.category.as_deref().map(Category::from_str_lossy),
            style: parse_style(self.style.as_deref()),
            quality: QualityTier::Standard,
        })
    }
}

fn parse_style(raw: Option<&str>) -> Style {
    match raw.map(str::to_lowercase).as_deref() {
        Some("detailed") => Style::Detailed,
        Some("abstract") => Style::Abstract,
        Some("geometric") => Style::Geometric,
        _ => Style::Minimal,
    }
}

fn parse_quality(raw: Option<&str>) -> QualityTier {
    match raw.map(str::to_lowercase).as_deref() {
        Some("draft") => QualityTier::Draft,
        Some("high") => QualityTier::High,
        _ => QualityTier::Standard,
    }
}

/// Successful generation response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub success: bool,
    /// URL or `data:` URL usable directly in an `<img>` tag
    pub image_url: String,
    pub generated_at: DateTime<Utc>,
    /// The compiled prompt the image was generated with
    pub prompt: String,
    pub style: String,
    /// Provider that produced the image (`fallback` for rendered diagrams)
    pub provider: String,
}

/// Cache statistics response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
    pub oldest_entry: Option<DateTime<Utc>>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Configured provider ids in preference order
    pub providers: Vec<String>,
    /// True when no provider is configured and only rendered diagrams serve
    pub fallback_only: bool,
}
