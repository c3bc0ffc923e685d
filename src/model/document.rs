//! Document-level markup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EmbeddedImage, ImageMetadata, PageMarkup};

/// A recoverable failure collected while processing a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Page the failure occurred on, if it was page-scoped
    pub page: Option<u32>,
    pub message: String,
}

impl Warning {
    pub fn new(page: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            page,
            message: message.into(),
        }
    }
}

/// Layout markup for a whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMarkup {
    /// Pages in processing order
    pub pages: Vec<PageMarkup>,

    /// Metadata for every drawn image, in sequence order
    #[serde(default)]
    pub images: Vec<ImageMetadata>,

    /// Extracted image payloads keyed by resource name
    #[serde(default)]
    pub resources: BTreeMap<String, EmbeddedImage>,

    /// Collected failures, in the order they occurred
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl DocumentMarkup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of processed pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a processed page by its page number.
    pub fn get_page(&self, page_num: u32) -> Option<&PageMarkup> {
        self.pages.iter().find(|p| p.number == page_num)
    }

    pub fn add_page(&mut self, page: PageMarkup) {
        self.pages.push(page);
    }

    pub fn add_resource(&mut self, image: EmbeddedImage) {
        self.resources
            .insert(image.metadata.resource_name.clone(), image);
    }

    pub fn get_resource(&self, name: &str) -> Option<&EmbeddedImage> {
        self.resources.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Text of every page, pages separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_pages() {
        let mut doc = DocumentMarkup::new();
        assert!(doc.is_empty());
        doc.add_page(PageMarkup::letter(2));
        doc.add_page(PageMarkup::letter(5));
        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(5).is_some());
        assert!(doc.get_page(1).is_none());
    }

    #[test]
    fn test_resources_keyed_by_name() {
        let mut doc = DocumentMarkup::new();
        doc.add_resource(EmbeddedImage::new(
            ImageMetadata::new("image/png", "image0.png", 0, 1),
            vec![0; 4],
        ));
        assert_eq!(doc.get_resource("image0.png").map(|r| r.size()), Some(4));
        assert!(!doc.has_warnings());
    }
}
