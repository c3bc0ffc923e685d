//! Positioned glyphs as delivered by the content-stream engine.

use serde::{Deserialize, Serialize};

use super::Matrix;

/// Font descriptor entries relevant to styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// `/FontFamily`, when the producer wrote one
    #[serde(default)]
    pub font_family: Option<String>,
    /// `/FontWeight` (100-900), 0 when absent
    #[serde(default)]
    pub font_weight: f32,
    /// `/ItalicAngle` in degrees
    #[serde(default)]
    pub italic_angle: f32,
}

/// A resolved font as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    /// Base font name, possibly subset-prefixed (`ABCDEF+Arial,Bold`)
    pub name: String,
    #[serde(default)]
    pub descriptor: Option<FontDescriptor>,
    /// Glyph space to text space
    #[serde(default = "default_font_matrix")]
    pub font_matrix: Matrix,
}

fn default_font_matrix() -> Matrix {
    Matrix::scale(0.001, 0.001)
}

impl FontInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: None,
            font_matrix: default_font_matrix(),
        }
    }

    pub fn with_descriptor(mut self, descriptor: FontDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }
}

/// One character as placed on the page.
///
/// Coordinates are direction-adjusted: `y` grows downwards from the top of
/// the page in reading orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphPosition {
    /// Unicode text of the glyph (usually one char, ligatures may be more)
    pub unicode: String,
    pub x: f32,
    pub y: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub width: f32,
    pub height: f32,
    pub font: FontInfo,
    /// Font size in points
    pub font_size_pt: f32,
    /// Font size scaled to device space
    pub y_scale: f32,
    pub space_width: f32,
    /// Text direction in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub dir: f32,
    #[serde(default)]
    pub text_matrix: Matrix,
}

impl GlyphPosition {
    /// A horizontal glyph at `(x, y)` advancing by `width`.
    pub fn new(unicode: impl Into<String>, x: f32, y: f32, width: f32, font: FontInfo, size: f32) -> Self {
        Self {
            unicode: unicode.into(),
            x,
            y,
            end_x: x + width,
            end_y: y,
            width,
            height: size * 0.7,
            font,
            font_size_pt: size,
            y_scale: size,
            space_width: size * 0.25,
            dir: 0.0,
            text_matrix: Matrix::new(size, 0.0, 0.0, size, x, y),
        }
    }

    pub fn is_space(&self) -> bool {
        self.unicode == " "
    }

    /// Angle of the glyph baseline, from the text matrix combined with the font matrix.
    pub fn angle(&self) -> i32 {
        self.font.font_matrix.multiply(&self.text_matrix).angle_degrees()
    }
}
