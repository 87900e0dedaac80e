//! Raw layout spans produced by the text extraction layer.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates (points).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }
}

/// One lexical run on a page with its font metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font is bold
    #[serde(default)]
    pub is_bold: bool,
    /// Whether the font is italic
    #[serde(default)]
    pub is_italic: bool,
    /// Position on the page
    #[serde(default)]
    pub bbox: BoundingBox,
    /// Page number (1-indexed, 0 if unknown)
    #[serde(default)]
    pub page: u32,
}

impl RawSpan {
    /// Create a new span with explicit style flags.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold: false,
            is_italic: false,
            bbox,
            page,
        }
    }

    /// Create a span and derive bold/italic flags from the font name
    /// (e.g., "Helvetica-BoldOblique").
    pub fn from_font_name(
        text: impl Into<String>,
        font_size: f32,
        font_name: &str,
        page: u32,
        bbox: BoundingBox,
    ) -> Self {
        let name = font_name.to_lowercase();
        let is_bold = name.contains("bold") || name.contains("black") || name.contains("heavy");
        let is_italic = name.contains("italic") || name.contains("oblique");

        Self {
            is_bold,
            is_italic,
            ..Self::new(text, font_size, page, bbox)
        }
    }

    /// Mark the span as bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark the span as italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Vertical position used for document ordering.
    pub fn y(&self) -> f32 {
        self.bbox.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_name_style_detection() {
        let span = RawSpan::from_font_name("Test", 12.0, "Helvetica-Bold", 1, BoundingBox::default());
        assert!(span.is_bold);
        assert!(!span.is_italic);

        let span = RawSpan::from_font_name(
            "Test",
            12.0,
            "Helvetica-Oblique",
            1,
            BoundingBox::default(),
        );
        assert!(!span.is_bold);
        assert!(span.is_italic);
    }

    #[test]
    fn test_span_deserialize_defaults() {
        let span: RawSpan =
            serde_json::from_str(r#"{"text":"Intro","font_size":18.0,"page":2}"#).unwrap();
        assert_eq!(span.page, 2);
        assert!(!span.is_bold);
        assert_eq!(span.bbox, BoundingBox::default());
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(10.0, 20.0, 110.0, 32.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 12.0);
    }
}
