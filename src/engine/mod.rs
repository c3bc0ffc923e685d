//! Content-stream engine abstraction.
//!
//! The engine owns the document container and the content-stream
//! interpreter. Layout components never see either; they receive ordered
//! per-page callbacks through [`PageTextCallbacks`] and
//! [`PageGraphicsCallbacks`], and the orchestrator drives the engine
//! through [`ContentStreamEngine`].

mod callbacks;
mod image;
pub mod replay;

pub use callbacks::{PageGraphicsCallbacks, PageTextCallbacks, PaintMode, WindingRule};
pub use image::{ColorSpace, PdfImage, StreamFilter, StreamId};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Matrix, PageBox};

/// Geometry of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub number: u32,
    #[serde(default)]
    pub media_box: PageBox,
    #[serde(default)]
    pub crop_box: Option<PageBox>,
    /// Page rotation in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub rotation: u16,
}

impl PageInfo {
    pub fn new(number: u32, media_box: PageBox) -> Self {
        Self {
            number,
            media_box,
            crop_box: None,
            rotation: 0,
        }
    }

    pub fn with_crop_box(mut self, crop_box: PageBox) -> Self {
        self.crop_box = Some(crop_box);
        self
    }

    pub fn with_rotation(mut self, rotation: u16) -> Self {
        self.rotation = rotation;
        self
    }

    /// The crop box when present, else the media box.
    pub fn view_box(&self) -> PageBox {
        self.crop_box.unwrap_or(self.media_box)
    }

    pub fn width(&self) -> f32 {
        self.media_box.width()
    }

    pub fn height(&self) -> f32 {
        self.media_box.height()
    }
}

/// Abstract interface to a content-stream interpreter.
///
/// Implementations decode the page content and report it as callbacks,
/// in content order. A callback error aborts the current pass and is
/// returned unchanged.
pub trait ContentStreamEngine {
    /// All page numbers, ascending.
    fn page_numbers(&self) -> Vec<u32>;

    fn page_info(&self, page: u32) -> Result<PageInfo>;

    /// Override the page's `/Rotate` value.
    fn set_page_rotation(&mut self, page: u32, rotation: u16) -> Result<()>;

    /// Prepend a transform to the page content for subsequent passes.
    fn prepend_transform(&mut self, page: u32, matrix: Matrix) -> Result<()>;

    /// Remove the most recently prepended transform.
    fn remove_prepended_transform(&mut self, page: u32) -> Result<()>;

    /// Run the text pass: one `on_glyph_run` per text-show operation.
    fn process_text(&mut self, page: u32, callbacks: &mut dyn PageTextCallbacks) -> Result<()>;

    /// Run the graphics pass: path, paint and image operators.
    fn process_graphics(
        &mut self,
        page: u32,
        callbacks: &mut dyn PageGraphicsCallbacks,
    ) -> Result<()>;

    /// Replay the transparency groups of the page's soft masks.
    fn process_soft_mask_groups(
        &mut self,
        _page: u32,
        _callbacks: &mut dyn PageGraphicsCallbacks,
    ) -> Result<()> {
        Ok(())
    }
}
