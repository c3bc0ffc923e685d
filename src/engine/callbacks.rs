//! Callback traits implemented by the layout components.

use serde::{Deserialize, Serialize};

use super::PdfImage;
use crate::error::Result;
use crate::model::{GlyphPosition, GraphicsState, Point};

/// Receives the text of a page, one text-show operation at a time.
pub trait PageTextCallbacks {
    /// A text-show operation: its text and the positioned glyphs it produced.
    fn on_glyph_run(&mut self, text: &str, glyphs: &[GlyphPosition]) -> Result<()>;

    /// The engine detected a paragraph break.
    fn on_paragraph_boundary(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Nonzero or even-odd fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindingRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// How the current path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "rule", rename_all = "snake_case")]
pub enum PaintMode {
    Stroke,
    Fill(WindingRule),
    FillAndStroke(WindingRule),
}

/// Receives the path, paint and image operators of a page.
///
/// Every method has a no-op default, so implementors only handle the
/// operators they care about.
pub trait PageGraphicsCallbacks {
    fn on_move_to(&mut self, _p: Point, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_line_to(&mut self, _p: Point, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_curve_to(&mut self, _c1: Point, _c2: Point, _end: Point, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    /// `re` operator, corners in user space: lower-left, lower-right, upper-right, upper-left.
    fn on_rect(&mut self, _corners: [Point; 4], _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_close_path(&mut self, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_end_path(&mut self, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_paint(&mut self, _mode: PaintMode, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_clip(&mut self, _rule: WindingRule, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_image(&mut self, _image: &dyn PdfImage, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }

    fn on_shading(&mut self, _name: &str, _gs: &GraphicsState) -> Result<()> {
        Ok(())
    }
}
