//! Minimal SVG document assembly

use std::fmt::Write;

/// A single SVG element with attributes and optional text content.
#[derive(Debug, Clone)]
pub struct SvgElement {
    tag: &'static str,
    attributes: Vec<(String, String)>,
    text: Option<String>,
}

impl SvgElement {
    /// Create a new element with the given tag
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            text: None,
        }
    }

    /// Add an attribute
    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Set text content (renders as `<tag ...>text</tag>`)
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(content.into());
        self
    }

    fn write_into(&self, out: &mut String) {
        let _ = write!(out, "  <{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, value);
        }
        match &self.text {
            Some(content) => {
                let _ = write!(out, ">{}</{}>\n", content, self.tag);
            }
            None => out.push_str(" />\n"),
        }
    }
}

/// Render a list of elements into a complete standalone SVG document.
pub fn render_document(width: u32, height: u32, elements: &[SvgElement]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = width,
        h = height
    );
    for element in elements {
        element.write_into(&mut out);
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_closing_element() {
        let doc = render_document(10, 10, &[SvgElement::new("circle").attr("r", 5)]);
        assert!(doc.contains("<circle r=\"5\" />"));
        assert!(doc.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(doc.ends_with("</svg>"));
    }

    #[test]
    fn test_text_element() {
        let doc = render_document(10, 10, &[SvgElement::new("text").attr("x", 1).text("?")]);
        assert!(doc.contains("<text x=\"1\">?</text>"));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let doc = render_document(400, 400, &[]);
        assert!(doc.contains("viewBox=\"0 0 400 400\""));
    }
}
