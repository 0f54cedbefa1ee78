//! Request and result models shared across the generation pipeline

use serde::{Deserialize, Serialize};

use crate::error::ErrorClass;

/// Question category; drives prompt templates and model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Matrix,
    Pattern,
    Cube,
    Geometric,
    Numerical,
    Spatial,
    Logical,
}

impl Category {
    /// Parse a category name, falling back to `Pattern` for anything
    /// unrecognized so a caller-supplied string can never fail the request.
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "matrix" => Category::Matrix,
            "cube" => Category::Cube,
            "geometric" => Category::Geometric,
            "numerical" => Category::Numerical,
            "spatial" => Category::Spatial,
            "logical" => Category::Logical,
            _ => Category::Pattern,
        }
    }

    /// Guess the category from a free-text description by keyword.
    pub fn infer(description: &str) -> Self {
        let lower = description.to_lowercase();
        if lower.contains("matrix") || lower.contains("grid") {
            Category::Matrix
        } else if lower.contains("cube") || lower.contains("3d") || lower.contains("dice") {
            Category::Cube
        } else if lower.contains("number") || lower.contains("sequence") || lower.contains("digit")
        {
            Category::Numerical
        } else if lower.contains("rotat") || lower.contains("fold") || lower.contains("mirror") {
            Category::Spatial
        } else if lower.contains("logic") || lower.contains("deduc") || lower.contains("syllogism")
        {
            Category::Logical
        } else if lower.contains("shape")
            || lower.contains("triangle")
            || lower.contains("circle")
            || lower.contains("polygon")
        {
            Category::Geometric
        } else {
            Category::Pattern
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Matrix => "matrix",
            Category::Pattern => "pattern",
            Category::Cube => "cube",
            Category::Geometric => "geometric",
            Category::Numerical => "numerical",
            Category::Spatial => "spatial",
            Category::Logical => "logical",
        }
    }
}

/// Visual style requested for the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Minimal,
    Detailed,
    Abstract,
    Geometric,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Minimal => "minimal",
            Style::Detailed => "detailed",
            Style::Abstract => "abstract",
            Style::Geometric => "geometric",
        }
    }
}

/// Output quality tier; trades cost against fidelity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Draft,
    #[default]
    Standard,
    High,
}

/// A fully-specified image generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Stable identity for caching and deduplication
    pub question_id: String,
    /// What the image should depict
    pub description: String,
    /// Question category; inferred from the description when absent
    pub category: Option<Category>,
    /// Requested visual style
    #[serde(default)]
    pub style: Style,
    /// Requested quality tier
    #[serde(default)]
    pub quality: QualityTier,
}

impl GenerationRequest {
    /// The category to generate with, inferring one if the caller gave none.
    pub fn resolved_category(&self) -> Category {
        self.category
            .unwrap_or_else(|| Category::infer(&self.description))
    }

    /// Cache/dedup key: identity plus everything that changes the output.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.question_id,
            self.style.as_str(),
            self.resolved_category().as_str()
        )
    }
}

/// Generated image payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImageContent {
    /// A URL (remote or `data:`) the client can put in an `<img>` tag
    Url(String),
    /// Inline SVG markup
    Svg(String),
}

impl ImageContent {
    /// Render the content as something an `<img src>` accepts.
    pub fn as_url(&self) -> String {
        match self {
            ImageContent::Url(url) => url.clone(),
            ImageContent::Svg(markup) => {
                use base64::{engine::general_purpose::STANDARD, Engine};
                format!("data:image/svg+xml;base64,{}", STANDARD.encode(markup))
            }
        }
    }
}

/// Outcome of a generation attempt, success or classified failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationResult {
    Success {
        content: ImageContent,
        /// Which provider produced the image
        provider: String,
        /// End-to-end latency in milliseconds
        took_ms: u64,
    },
    Failure {
        error_class: ErrorClass,
        message: String,
        /// Last provider attempted, if any
        provider: Option<String>,
    },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }
}

/// Static description of a provider for listings and health output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Stable provider id (e.g. `stability`)
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Models the provider can serve
    pub models: Vec<ModelInfo>,
}

/// A single model a provider offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model id as sent on the wire
    pub id: String,
    /// API engine/endpoint family
    pub engine: String,
    /// Largest square edge the model supports
    pub max_resolution: u32,
    /// Cost per generated image in USD
    pub cost_per_image: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_inference() {
        assert_eq!(Category::infer("a 3x3 matrix puzzle"), Category::Matrix);
        assert_eq!(Category::infer("rotating cube faces"), Category::Cube);
        assert_eq!(Category::infer("number sequence 2 4 8"), Category::Numerical);
        assert_eq!(Category::infer("mirror the folded paper"), Category::Spatial);
        assert_eq!(Category::infer("logical deduction chain"), Category::Logical);
        assert_eq!(Category::infer("overlapping circles"), Category::Geometric);
        assert_eq!(Category::infer("something abstract"), Category::Pattern);
    }

    #[test]
    fn test_category_lossy_parse_defaults_to_pattern() {
        assert_eq!(Category::from_str_lossy("MATRIX"), Category::Matrix);
        assert_eq!(Category::from_str_lossy("bogus"), Category::Pattern);
    }

    #[test]
    fn test_cache_key_varies_with_style() {
        let mut request = GenerationRequest {
            question_id: "q1".into(),
            description: "a grid".into(),
            category: None,
            style: Style::Minimal,
            quality: QualityTier::Standard,
        };
        let minimal = request.cache_key();
        request.style = Style::Detailed;
        assert_ne!(minimal, request.cache_key());
    }

    #[test]
    fn test_svg_content_as_data_url() {
        let content = ImageContent::Svg("<svg></svg>".into());
        assert!(content.as_url().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_quality_tier_wire_strings() {
        assert_eq!(
            serde_json::from_str::<QualityTier>("\"high\"").unwrap(),
            QualityTier::High
        );
        assert_eq!(
            serde_json::from_str::<QualityTier>("\"draft\"").unwrap(),
            QualityTier::Draft
        );
        assert_eq!(serde_json::to_string(&QualityTier::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_result_tagged_serialization() {
        let result = GenerationResult::Failure {
            error_class: ErrorClass::RateLimited,
            message: "slow down".into(),
            provider: Some("stability".into()),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"failure\""));
        assert!(json.contains("\"rate_limited\""));
    }
}
