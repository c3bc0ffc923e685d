//! The slice of graphics state the engine passes with each graphics callback.

use serde::{Deserialize, Serialize};

use super::Matrix;

/// A color as raw components in its own color space.
///
/// Gray has one component, RGB three, CMYK four; pattern colors may have none.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color {
    pub components: Vec<f32>,
}

impl Color {
    pub fn new(components: Vec<f32>) -> Self {
        Self { components }
    }

    pub fn gray(level: f32) -> Self {
        Self::new(vec![level])
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(vec![r, g, b])
    }

    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self::new(vec![c, m, y, k])
    }

    pub fn black() -> Self {
        Self::gray(0.0)
    }
}

/// Graphics state snapshot at the time of a callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsState {
    #[serde(default = "Color::black")]
    pub stroking_color: Color,
    #[serde(default = "Color::black")]
    pub non_stroking_color: Color,
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    #[serde(default)]
    pub ctm: Matrix,
}

fn default_line_width() -> f32 {
    1.0
}

impl GraphicsState {
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_stroking_color(mut self, color: Color) -> Self {
        self.stroking_color = color;
        self
    }

    pub fn with_non_stroking_color(mut self, color: Color) -> Self {
        self.non_stroking_color = color;
        self
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            stroking_color: Color::black(),
            non_stroking_color: Color::black(),
            line_width: default_line_width(),
            ctm: Matrix::identity(),
        }
    }
}
