//! Model selection
//!
//! Maps a (category, quality tier) pair to the model best suited for it,
//! with a default row for categories without a specific preference, and
//! derives the square output resolution from the chosen model's limits.

use crate::models::{Category, ModelInfo, QualityTier};

/// Square output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    fn square(edge: u32) -> Self {
        Self {
            width: edge,
            height: edge,
        }
    }
}

/// Pick the model for a category and tier.
///
/// Pattern, spatial, geometric, and matrix categories have dedicated rows;
/// everything else uses the default row.
pub fn select_model(category: Category, quality: QualityTier) -> ModelInfo {
    use Category::*;
    use QualityTier::*;

    let id = match (category, quality) {
        (Pattern, Draft) => "sdxl-1.0",
        (Pattern, Standard) => "sd-3.5-medium",
        (Pattern, High) => "sd-3.5-large",

        (Spatial, Draft) => "sdxl-1.0",
        (Spatial, Standard) => "sd-3.5-large-turbo",
        (Spatial, High) => "stable-image-core",

        (Geometric, Draft) => "sdxl-1.0",
        (Geometric, Standard) => "sd-3.5-medium",
        (Geometric, High) => "stable-image-core",

        (Matrix, Draft) => "sdxl-1.0",
        (Matrix, Standard) => "sd-3.5-large-turbo",
        (Matrix, High) => "sd-3.5-large",

        // Default row
        (_, Draft) => "sd-1.6",
        (_, Standard) => "sdxl-1.0",
        (_, High) => "sd-3.5-medium",
    };
    model_info(id)
}

/// Static metadata for a model id.
fn model_info(id: &str) -> ModelInfo {
    let (engine, max_resolution, cost_per_image) = match id {
        "sd-3.5-large" => ("sd3", 1024, 0.065),
        "sd-3.5-large-turbo" => ("sd3", 1024, 0.04),
        "sd-3.5-medium" => ("sd3", 1024, 0.035),
        "stable-image-core" => ("core", 1024, 0.03),
        "sd-1.6" => ("v1", 512, 0.002),
        _ => ("sdxl", 1024, 0.009),
    };
    ModelInfo {
        id: id.to_string(),
        engine: engine.to_string(),
        max_resolution,
        cost_per_image,
    }
}

/// Derive the output resolution for a model. Output is always square:
/// 1024×1024 when the model supports it, 512×512 otherwise.
pub fn resolution_for(model: &ModelInfo) -> Resolution {
    if model.max_resolution >= 1024 {
        Resolution::square(1024)
    } else {
        Resolution::square(512)
    }
}
