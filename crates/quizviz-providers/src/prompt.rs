//! Prompt compilation
//!
//! Turns a question description into a provider-ready prompt: a per-category
//! template with the description substituted in, style modifiers appended,
//! and a standing negative clause to keep text and clutter out of the image.

use crate::models::{Category, Style};

/// A compiled prompt pair ready to send to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt {
    pub positive: String,
    pub negative: String,
}

const NEGATIVE_CLAUSE: &str =
    "text, words, letters, numbers, watermark, signature, blurry, low quality, distorted";

fn template(category: Category) -> &'static str {
    match category {
        Category::Matrix => {
            "Create a clean 3x3 matrix puzzle visualization: {description}. \
             Grid of cells with geometric symbols, the final cell marked with a question mark"
        }
        Category::Pattern => {
            "Create an abstract pattern sequence visualization: {description}. \
             Repeating geometric elements with one element following a transformation rule"
        }
        Category::Cube => {
            "Create a 3D cube visualization: {description}. \
             Isometric wireframe cube with clearly distinguishable faces"
        }
        Category::Geometric => {
            "Create a precise geometric diagram: {description}. \
             Clean shapes with exact proportions on a plain background"
        }
        Category::Numerical => {
            "Create a numerical sequence visualization: {description}. \
             Abstract representation of quantities without written digits"
        }
        Category::Spatial => {
            "Create a spatial reasoning visualization: {description}. \
             Rotated or folded shapes shown from multiple angles"
        }
        Category::Logical => {
            "Create a logical relationship diagram: {description}. \
             Connected shapes expressing an if-then structure"
        }
    }
}

fn style_modifiers(style: Style) -> &'static str {
    match style {
        Style::Minimal => "minimalist, clean lines, high contrast, white background",
        Style::Detailed => "detailed, precise shading, subtle gradients, professional",
        Style::Abstract => "abstract, bold shapes, flat colors, modern composition",
        Style::Geometric => "geometric precision, ruler-straight edges, mathematical aesthetic",
    }
}

/// Compile a prompt for the given inputs.
///
/// An empty description still yields a usable prompt: the template text
/// stands on its own. Compilation is deterministic and idempotent over its
/// inputs.
pub fn compile_prompt(description: &str, category: Category, style: Style) -> CompiledPrompt {
    let description = description.trim();
    let positive = if description.is_empty() {
        template(category).replace(": {description}.", ".")
    } else {
        template(category).replace("{description}", description)
    };

    CompiledPrompt {
        positive: format!("{}. Style: {}", positive, style_modifiers(style)),
        negative: NEGATIVE_CLAUSE.to_string(),
    }
}
