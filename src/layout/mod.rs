//! Text layout: glyph runs to positioned word spans.

mod angle;
mod font;
pub mod segmenter;
mod text;

pub use angle::AngleCollector;
pub use font::{FontResolver, ResolvedFont};
pub use segmenter::{Segmenter, GAP_THRESHOLD};
pub use text::TextLayout;
