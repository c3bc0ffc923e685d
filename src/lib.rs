//! # pdflayout
//!
//! Layout reconstruction from PDF content-stream callbacks.
//!
//! A content-stream engine reports each page as ordered callbacks:
//! positioned glyphs, path operators, and image draws. This crate turns
//! them into absolutely positioned, font-styled text spans, line and
//! rectangle hints for table detection, and extracted images.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdflayout::engine::replay::RecordedDocument;
//! use pdflayout::{process_document, render, ParseOptions};
//!
//! fn main() -> pdflayout::Result<()> {
//!     let mut trace = RecordedDocument::from_path("trace.json")?;
//!     let markup = process_document(&mut trace, ParseOptions::new().with_inline_images(true))?;
//!
//!     let xhtml = render::to_xhtml(&markup, &render::XhtmlOptions::default())?;
//!     println!("{}", xhtml);
//!     Ok(())
//! }
//! ```
//!
//! ## Components
//!
//! - [`layout`]: glyph runs to words and spans
//! - [`graphics`]: path operators to `line`/`rect` hints
//! - [`images`]: image dedup, bounded copy, and re-encoding
//! - [`orchestrator`]: per-page sequencing, catch policy, rotated text
//! - [`render`]: sinks plus XHTML and JSON output

pub mod engine;
pub mod error;
pub mod graphics;
pub mod images;
pub mod layout;
pub mod model;
pub mod options;
pub mod orchestrator;
pub mod render;

// Re-export commonly used types
pub use engine::{ContentStreamEngine, PageInfo};
pub use error::{Error, Result};
pub use model::{DocumentMarkup, Fragment, PageMarkup, Warning};
pub use options::{CatchMode, PageSelection, ParseOptions};
pub use orchestrator::{Orchestrator, ProcessReport};
pub use render::{JsonFormat, XhtmlOptions};

use std::path::Path;

use rayon::prelude::*;

use engine::replay::RecordedDocument;

/// Lay out a whole document into in-memory markup.
///
/// # Example
///
/// ```
/// use pdflayout::engine::replay::{RecordedDocument, RecordedPage};
/// use pdflayout::model::{FontInfo, GlyphPosition, PageBox};
/// use pdflayout::{process_document, PageInfo, ParseOptions};
///
/// let glyphs = "Hi"
///     .chars()
///     .enumerate()
///     .map(|(i, c)| GlyphPosition::new(c.to_string(), 72.0 + i as f32 * 6.0, 700.0, 6.0, FontInfo::new("Helvetica"), 12.0))
///     .collect();
/// let page = RecordedPage::new(PageInfo::new(1, PageBox::letter())).with_run(glyphs);
/// let mut trace = RecordedDocument::new(vec![page]);
///
/// let markup = process_document(&mut trace, ParseOptions::default()).unwrap();
/// assert_eq!(markup.plain_text(), "Hi");
/// ```
pub fn process_document(
    engine: &mut dyn ContentStreamEngine,
    options: ParseOptions,
) -> Result<DocumentMarkup> {
    Orchestrator::new(options).process_to_markup(engine)
}

/// Lay out a recorded trace file.
pub fn process_trace_file<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<DocumentMarkup> {
    let mut trace = RecordedDocument::from_path(path)?;
    process_document(&mut trace, options)
}

/// Lay out independent documents in parallel.
///
/// Each document gets its own orchestrator state; results are returned
/// in input order.
pub fn process_documents<E>(engines: Vec<E>, options: &ParseOptions) -> Vec<Result<DocumentMarkup>>
where
    E: ContentStreamEngine + Send,
{
    let orchestrator = Orchestrator::new(options.clone());
    engines
        .into_par_iter()
        .map(|mut engine| orchestrator.process_to_markup(&mut engine))
        .collect()
}

/// Builder for laying out and rendering documents.
///
/// # Example
///
/// ```no_run
/// use pdflayout::PdfLayout;
///
/// let xhtml = PdfLayout::new()
///     .with_images(true)
///     .detect_angles()
///     .fail_fast()
///     .process_trace("trace.json")?
///     .to_xhtml()?;
/// # Ok::<(), pdflayout::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfLayout {
    options: ParseOptions,
    xhtml: XhtmlOptions,
}

impl PdfLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Propagate the first failure instead of collecting warnings.
    pub fn fail_fast(mut self) -> Self {
        self.options = self.options.fail_fast();
        self
    }

    /// Re-run text layout per glyph angle.
    pub fn detect_angles(mut self) -> Self {
        self.options = self.options.with_detect_angles(true);
        self
    }

    /// Enable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.options = self.options.with_inline_images(extract);
        self
    }

    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.options = self.options.with_write_limit(limit);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    pub fn with_xhtml_options(mut self, options: XhtmlOptions) -> Self {
        self.xhtml = options;
        self
    }

    pub fn process(self, engine: &mut dyn ContentStreamEngine) -> Result<LayoutResult> {
        let markup = process_document(engine, self.options)?;
        Ok(LayoutResult {
            markup,
            xhtml: self.xhtml,
        })
    }

    pub fn process_trace<P: AsRef<Path>>(self, path: P) -> Result<LayoutResult> {
        let mut trace = RecordedDocument::from_path(path)?;
        self.process(&mut trace)
    }
}

/// Markup produced by [`PdfLayout`].
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// The laid-out document
    pub markup: DocumentMarkup,
    xhtml: XhtmlOptions,
}

impl LayoutResult {
    pub fn to_xhtml(&self) -> Result<String> {
        render::to_xhtml(&self.markup, &self.xhtml)
    }

    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.markup, format)
    }

    pub fn plain_text(&self) -> String {
        self.markup.plain_text()
    }
}
