//! Per-document state shared by the page passes.

use std::collections::HashMap;

use crate::engine::StreamId;
use crate::model::{ImageMetadata, Warning};

/// State that outlives a single page.
///
/// Image numbers are assigned from one counter per document, starting at
/// 0, and images backed by the same stream keep their first number.
#[derive(Debug, Default)]
pub struct DocumentContext {
    processed: HashMap<StreamId, u32>,
    counter: u32,
    images: Vec<ImageMetadata>,
    warnings: Vec<Warning>,
}

/// Number assigned to an image draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageNumber {
    /// First time this image is seen
    Fresh(u32),
    /// Stream already extracted under this number
    Seen(u32),
}

impl ImageNumber {
    pub fn value(self) -> u32 {
        match self {
            ImageNumber::Fresh(n) | ImageNumber::Seen(n) => n,
        }
    }
}

impl DocumentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number for an image; images without stream identity are always fresh.
    pub fn image_number(&mut self, id: Option<StreamId>) -> ImageNumber {
        let Some(id) = id else {
            return ImageNumber::Fresh(self.next_number());
        };
        if let Some(&seen) = self.processed.get(&id) {
            return ImageNumber::Seen(seen);
        }
        let number = self.next_number();
        self.processed.insert(id, number);
        ImageNumber::Fresh(number)
    }

    fn next_number(&mut self) -> u32 {
        let number = self.counter;
        self.counter += 1;
        number
    }

    /// Numbers handed out so far.
    pub fn image_count(&self) -> u32 {
        self.counter
    }

    pub fn record_image(&mut self, metadata: ImageMetadata) {
        self.images.push(metadata);
    }

    pub fn images(&self) -> &[ImageMetadata] {
        &self.images
    }

    pub fn add_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consume the context, returning image metadata and warnings.
    pub fn finish(self) -> (Vec<ImageMetadata>, Vec<Warning>) {
        (self.images, self.warnings)
    }
}
