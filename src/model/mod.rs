//! Data model for layout reconstruction.
//!
//! Input types (`GlyphPosition`, `GraphicsState`, geometry) describe what the
//! content-stream engine reports; output types (`Fragment`, `PageMarkup`,
//! `DocumentMarkup`) describe the reconstructed layout.

mod document;
mod geometry;
mod glyph;
mod graphics_state;
mod markup;
mod page;
mod resource;

pub use document::{DocumentMarkup, Warning};
pub use geometry::{Matrix, PageBox, Point};
pub use glyph::{FontDescriptor, FontInfo, GlyphPosition};
pub use graphics_state::{Color, GraphicsState};
pub use markup::{
    format_float, Fragment, ImageFragment, LineFragment, RectFragment, Rgb, StrokeStyle,
    TextFragment, WordBox, WordFont,
};
pub use page::PageMarkup;
pub use resource::{EmbeddedImage, EmbeddedResourceType, ImageMetadata};
