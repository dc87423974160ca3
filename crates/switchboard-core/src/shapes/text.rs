//! Text label shape.

use super::{SerializableColor, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Width of an average glyph relative to the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.6;
/// Line height relative to the font size.
const LINE_HEIGHT_RATIO: f64 = 1.16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// A single- or multi-line text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Top-left corner of the text box.
    pub position: Point,
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    pub fill: SerializableColor,
}

impl Text {
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
            font_size: 16.0,
            font_family: "Arial".to_string(),
            font_weight: FontWeight::Normal,
            fill: SerializableColor::black(),
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_fill(mut self, fill: SerializableColor) -> Self {
        self.fill = fill;
        self
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = FontWeight::Bold;
        self
    }

    /// Approximate layout size without a font engine.
    pub fn approximate_size(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.content.split('\n').collect();
        let max_chars = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let width = max_chars as f64 * self.font_size * GLYPH_WIDTH_RATIO;
        let height = lines.len() as f64 * self.font_size * LINE_HEIGHT_RATIO;
        (width, height)
    }
}

impl ShapeTrait for Text {
    fn bounds(&self) -> Rect {
        let (width, height) = self.approximate_size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        // Glyph outlines are the renderer's business; the box stands in.
        self.bounds().to_path(0.1)
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let scale = affine.as_coeffs();
        self.font_size *= scale[3].abs();
    }
}
