//! Deterministic vector diagram rendering for quiz illustrations
//!
//! This crate is the guarantee that a quiz item is never left without a
//! visual: every entry point is a pure function over its inputs, performs no
//! I/O, and always produces valid SVG markup. Unrecognized descriptions
//! degrade to a simple default diagram instead of failing.

pub mod diagrams;
pub mod svg;

pub use diagrams::{render, DiagramType, RenderOptions, RenderStyle};
pub use svg::{render_document, SvgElement};

use base64::{engine::general_purpose::STANDARD, Engine};

/// Encode SVG markup as a `data:` URL usable in an `<img>` tag.
pub fn svg_to_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}
