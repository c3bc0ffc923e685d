//! Text-pass callbacks that segment glyph runs and emit spans.

use super::segmenter::Segmenter;
use crate::engine::PageTextCallbacks;
use crate::error::{ErrorCollector, Result};
use crate::model::{Fragment, GlyphPosition};
use crate::render::MarkupSink;

/// Feeds each glyph run through the [`Segmenter`] and writes the spans to a sink.
pub struct TextLayout<'a> {
    segmenter: &'a Segmenter,
    sink: &'a mut dyn MarkupSink,
    errors: &'a mut ErrorCollector,
    angle: Option<i32>,
    runs: usize,
    spans: usize,
}

impl<'a> TextLayout<'a> {
    pub fn new(
        segmenter: &'a Segmenter,
        sink: &'a mut dyn MarkupSink,
        errors: &'a mut ErrorCollector,
    ) -> Self {
        Self {
            segmenter,
            sink,
            errors,
            angle: None,
            runs: 0,
            spans: 0,
        }
    }

    /// Only lay out glyphs whose baseline angle is `angle` degrees.
    pub fn restricted_to_angle(mut self, angle: i32) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Spans emitted so far.
    pub fn span_count(&self) -> usize {
        self.spans
    }

    pub fn run_count(&self) -> usize {
        self.runs
    }
}

impl PageTextCallbacks for TextLayout<'_> {
    fn on_glyph_run(&mut self, text: &str, glyphs: &[GlyphPosition]) -> Result<()> {
        self.runs += 1;

        let filtered;
        let glyphs = match self.angle {
            Some(angle) => {
                filtered = glyphs
                    .iter()
                    .filter(|g| g.angle() == angle)
                    .cloned()
                    .collect::<Vec<_>>();
                filtered.as_slice()
            }
            None => glyphs,
        };

        let spans = match self.segmenter.segment(text, glyphs) {
            Ok(spans) => spans,
            Err(e) => return self.errors.handle(e),
        };
        for span in spans {
            self.spans += 1;
            self.sink.emit(Fragment::Paragraph(span))?;
        }
        Ok(())
    }

    fn on_paragraph_boundary(&mut self) -> Result<()> {
        log::trace!("Paragraph boundary after {} runs", self.runs);
        Ok(())
    }
}
