//! Per-page sequencing of the layout passes.
//!
//! For each selected page the [`Orchestrator`] runs, in order: the text
//! pass through the [`Segmenter`], the vector pass through the
//! [`PathTracker`], and the image pass (page content, then soft-mask
//! groups) through the [`ImageExtractor`]. Failures go through an
//! [`ErrorCollector`] so the [`CatchMode`](crate::options::CatchMode)
//! decides whether a page continues.

mod context;
mod rotation;

pub use context::{DocumentContext, ImageNumber};
pub use rotation::{PageRotationGuard, RotationGuard};

use crate::engine::{ContentStreamEngine, PageInfo};
use crate::error::{ErrorCollector, Result};
use crate::graphics::PathTracker;
use crate::images::{CollectingHandler, EmbeddedHandler, ExtractSettings, ImageExtractor};
use crate::layout::{AngleCollector, Segmenter, TextLayout};
use crate::model::{DocumentMarkup, ImageMetadata, Warning};
use crate::options::ParseOptions;
use crate::render::{LimitedSink, MarkupCollector, MarkupSink};

/// Outcome of [`Orchestrator::process`].
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    /// Page numbers processed, in order
    pub pages: Vec<u32>,
    /// Metadata of every drawn image
    pub images: Vec<ImageMetadata>,
    /// Recovered failures, in the order they occurred
    pub warnings: Vec<Warning>,
}

/// Drives a [`ContentStreamEngine`] through the layout passes of a document.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    options: ParseOptions,
    segmenter: Segmenter,
}

impl Orchestrator {
    pub fn new(options: ParseOptions) -> Self {
        let segmenter = Segmenter::from_options(&options);
        Self { options, segmenter }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Process a document, writing markup to `sink` and image bytes to `handler`.
    ///
    /// Returns the first error that must propagate: always the write limit,
    /// and under `FailFast` any failure except a bad image stream, which
    /// stays on that image's metadata. Pages already written stay in the
    /// sink.
    pub fn process(
        &self,
        engine: &mut dyn ContentStreamEngine,
        sink: &mut dyn MarkupSink,
        handler: &mut dyn EmbeddedHandler,
    ) -> Result<ProcessReport> {
        let mut context = DocumentContext::new();
        let mut sink = LimitedSink::new(sink, self.options.write_limit);

        let pages: Vec<u32> = engine
            .page_numbers()
            .into_iter()
            .filter(|p| self.options.pages.includes(*p))
            .collect();
        log::debug!("Processing {} pages", pages.len());

        for &number in &pages {
            self.process_page(engine, number, &mut sink, handler, &mut context)?;
        }

        let (images, warnings) = context.finish();
        Ok(ProcessReport {
            pages,
            images,
            warnings,
        })
    }

    /// Process a document into in-memory markup with extracted images attached.
    pub fn process_to_markup(&self, engine: &mut dyn ContentStreamEngine) -> Result<DocumentMarkup> {
        let mut collector = MarkupCollector::new();
        let mut handler = CollectingHandler::new();
        let report = self.process(engine, &mut collector, &mut handler)?;

        let mut doc = DocumentMarkup::new();
        for mut page in collector.into_pages() {
            for warning in &report.warnings {
                if warning.page == Some(page.number) {
                    page.add_warning(warning.message.clone());
                }
            }
            doc.add_page(page);
        }
        for image in handler.into_images() {
            doc.add_resource(image);
        }
        doc.images = report.images;
        doc.warnings = report.warnings;
        Ok(doc)
    }

    fn process_page(
        &self,
        engine: &mut dyn ContentStreamEngine,
        number: u32,
        sink: &mut dyn MarkupSink,
        handler: &mut dyn EmbeddedHandler,
        context: &mut DocumentContext,
    ) -> Result<()> {
        let info = engine.page_info(number)?;
        let mut errors = ErrorCollector::new(self.options.catch_mode);

        sink.start_page(&info)?;
        let result = self.run_passes(engine, &info, sink, handler, context, &mut errors);
        for err in errors.drain() {
            context.add_warning(Warning::new(Some(number), err.to_string()));
        }
        let ended = sink.end_page();
        result?;
        ended
    }

    fn run_passes(
        &self,
        engine: &mut dyn ContentStreamEngine,
        info: &PageInfo,
        sink: &mut dyn MarkupSink,
        handler: &mut dyn EmbeddedHandler,
        context: &mut DocumentContext,
        errors: &mut ErrorCollector,
    ) -> Result<()> {
        let number = info.number;

        if self.options.detect_angles {
            self.text_by_angle(engine, number, sink, errors)?;
        } else {
            self.text_pass(engine, number, None, sink, errors)?;
        }

        if self.options.extract_vector_graphics {
            let mut tracker = PathTracker::from_options(info.clone(), sink, &self.options);
            let result = engine.process_graphics(number, &mut tracker);
            let dropped = tracker.dropped();
            if dropped > 0 {
                context.add_warning(Warning::new(
                    Some(number),
                    format!("{} vector primitives dropped over the page limit", dropped),
                ));
            }
            if let Err(e) = result {
                errors.handle(e)?;
            }
        }

        if self.options.extract_inline_images {
            let settings = ExtractSettings::from(&self.options);
            let result = {
                let mut extractor = ImageExtractor::new(number, settings, context, sink, handler, errors);
                engine
                    .process_graphics(number, &mut extractor)
                    .and_then(|_| engine.process_soft_mask_groups(number, &mut extractor))
            };
            if let Err(e) = result {
                errors.handle(e)?;
            }
        }

        Ok(())
    }

    fn text_pass(
        &self,
        engine: &mut dyn ContentStreamEngine,
        page: u32,
        angle: Option<i32>,
        sink: &mut dyn MarkupSink,
        errors: &mut ErrorCollector,
    ) -> Result<()> {
        let result = {
            let mut layout = TextLayout::new(&self.segmenter, sink, errors);
            if let Some(angle) = angle {
                layout = layout.restricted_to_angle(angle);
            }
            engine.process_text(page, &mut layout)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) => errors.handle(e),
        }
    }

    /// Lay out each baseline angle separately with the page rotated upright.
    fn text_by_angle(
        &self,
        engine: &mut dyn ContentStreamEngine,
        page: u32,
        sink: &mut dyn MarkupSink,
        errors: &mut ErrorCollector,
    ) -> Result<()> {
        let mut collector = AngleCollector::new();
        if let Err(e) = engine.process_text(page, &mut collector) {
            return errors.handle(e);
        }
        let angles = collector.angles();
        log::debug!("Page {} text angles: {:?}", page, angles);

        let mut upright = PageRotationGuard::new(engine, page)?;
        for angle in angles {
            if angle == 0 {
                self.text_pass(&mut *upright, page, Some(0), sink, errors)?;
            } else {
                let mut rotated = RotationGuard::new(&mut *upright, page, angle)?;
                self.text_pass(&mut *rotated, page, Some(0), sink, errors)?;
            }
        }
        Ok(())
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::replay::{GraphicsOp, RecordedDocument, RecordedImage, RecordedPage};
    use crate::engine::ColorSpace;
    use crate::error::Error;
    use crate::model::{FontInfo, GlyphPosition, Matrix, PageBox};
    use crate::options::PageSelection;

    fn word(text: &str, x: f32) -> Vec<GlyphPosition> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                GlyphPosition::new(c.to_string(), x + i as f32 * 6.0, 700.0, 6.0, FontInfo::new("Helvetica"), 12.0)
            })
            .collect()
    }

    fn page(number: u32) -> RecordedPage {
        RecordedPage::new(PageInfo::new(number, PageBox::letter()))
    }

    #[test]
    fn test_passes_run_in_order() {
        let image = RecordedImage::new(1, 1, ColorSpace::DeviceRgb, &["DCTDecode"], vec![0xFF, 0xD8]);
        let p = page(1).with_run(word("Hello", 72.0)).with_graphics(vec![
            GraphicsOp::Image(image),
            GraphicsOp::MoveTo { x: 0.0, y: 0.0 },
            GraphicsOp::LineTo { x: 100.0, y: 0.0 },
        ]);
        let mut doc = RecordedDocument::new(vec![p]);
        let options = ParseOptions::new().with_inline_images(true);

        let markup = Orchestrator::new(options).process_to_markup(&mut doc).unwrap();
        let tags: Vec<&str> = markup.pages[0].fragments.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, vec!["p", "line", "img"]);
        assert_eq!(markup.images.len(), 1);
        assert!(markup.get_resource("image0.jpg").is_some());
    }

    #[test]
    fn test_vector_graphics_can_be_disabled() {
        let p = page(1).with_graphics(vec![GraphicsOp::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        }]);
        let mut doc = RecordedDocument::new(vec![p]);
        let options = ParseOptions::new().with_vector_graphics(false);
        let markup = Orchestrator::new(options).process_to_markup(&mut doc).unwrap();
        assert!(markup.pages[0].is_empty());
    }

    #[test]
    fn test_page_selection() {
        let mut doc = RecordedDocument::new(vec![
            page(1).with_run(word("one", 10.0)),
            page(2).with_run(word("two", 10.0)),
            page(3).with_run(word("three", 10.0)),
        ]);
        let options = ParseOptions::new().with_pages(PageSelection::Pages(vec![2]));
        let markup = Orchestrator::new(options).process_to_markup(&mut doc).unwrap();
        assert_eq!(markup.page_count(), 1);
        assert_eq!(markup.plain_text(), "two");
    }

    #[test]
    fn test_accumulate_records_page_warning() {
        let bad = RecordedImage::new(1, 1, ColorSpace::DeviceRgb, &["LZWDecode", "DCTDecode"], vec![1]);
        let p = page(1)
            .with_graphics(vec![GraphicsOp::Image(bad)])
            .with_run(word("ok", 10.0));
        let mut doc = RecordedDocument::new(vec![p]);
        let options = ParseOptions::new().with_inline_images(true);

        let markup = Orchestrator::new(options).process_to_markup(&mut doc).unwrap();
        assert_eq!(markup.plain_text(), "ok");
        assert_eq!(markup.warnings.len(), 1);
        assert_eq!(markup.warnings[0].page, Some(1));
        assert_eq!(markup.pages[0].warnings.len(), 1);
        assert!(markup.images[0].has_exceptions());
    }

    #[test]
    fn test_fail_fast_keeps_image_failures_on_metadata() {
        let bad = RecordedImage::new(1, 1, ColorSpace::DeviceRgb, &["LZWDecode", "DCTDecode"], vec![1]);
        let mut doc = RecordedDocument::new(vec![
            page(1).with_graphics(vec![GraphicsOp::Image(bad)]),
            page(2).with_run(word("after", 10.0)),
        ]);
        let options = ParseOptions::new().with_inline_images(true).fail_fast();
        let markup = Orchestrator::new(options).process_to_markup(&mut doc).unwrap();
        assert_eq!(markup.page_count(), 2);
        assert_eq!(markup.pages[1].plain_text(), "after");
        assert!(markup.images[0].exceptions[0].contains("LZWDecode"));
        assert!(markup.warnings.is_empty());
    }

    #[test]
    fn test_fail_fast_propagates_image_size_limit() {
        let image = RecordedImage::new(1, 1, ColorSpace::DeviceRgb, &["DCTDecode"], vec![0xFF, 0xD8, 0xFF, 0xD9]);
        let mut doc = RecordedDocument::new(vec![page(1).with_graphics(vec![GraphicsOp::Image(image)])]);
        let options = ParseOptions::new()
            .with_inline_images(true)
            .with_max_image_bytes(2)
            .fail_fast();
        let result = Orchestrator::new(options).process_to_markup(&mut doc);
        assert!(matches!(result, Err(Error::ResourceLimitExceeded { limit: 2, .. })));
    }

    #[test]
    fn test_write_limit_is_fatal_in_accumulate_mode() {
        let mut doc = RecordedDocument::new(vec![
            page(1).with_run(word("abc", 10.0)),
            page(2).with_run(word("defgh", 10.0)),
        ]);
        let options = ParseOptions::new().with_write_limit(5);
        let result = Orchestrator::new(options).process_to_markup(&mut doc);
        assert!(matches!(result, Err(Error::WriteLimitReached(5))));
    }

    #[test]
    fn test_detect_angles_lays_out_rotated_text() {
        let mut rotated = word("up", 100.0);
        for g in &mut rotated {
            g.text_matrix = Matrix::rotation(90f32.to_radians());
        }
        let p = RecordedPage::new(PageInfo::new(1, PageBox::letter()).with_rotation(90))
            .with_run(word("flat", 10.0))
            .with_run(rotated);
        let mut doc = RecordedDocument::new(vec![p]);

        let plain = Orchestrator::default().process_to_markup(&mut doc).unwrap();
        assert_eq!(plain.plain_text(), "flat");

        let options = ParseOptions::new().with_detect_angles(true);
        let markup = Orchestrator::new(options).process_to_markup(&mut doc).unwrap();
        assert_eq!(markup.plain_text(), "flat\nup");
        assert_eq!(doc.page_info(1).unwrap().rotation, 90);
    }
}
