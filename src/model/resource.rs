//! Extracted image resources and their metadata.

use serde::{Deserialize, Serialize};

/// How an extracted resource was embedded in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmbeddedResourceType {
    /// Drawn inline by the page content
    #[default]
    Inline,
    /// Attached to the document as a file
    Attachment,
}

impl EmbeddedResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddedResourceType::Inline => "INLINE",
            EmbeddedResourceType::Attachment => "ATTACHMENT",
        }
    }
}

/// Metadata recorded for every drawn image, whether or not its bytes were extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// MIME type (e.g., "image/png")
    pub content_type: String,

    /// Resource name, `image<N>.<suffix>`
    pub resource_name: String,

    pub embedded_resource_type: EmbeddedResourceType,

    /// Sequence number within the document
    pub sequence_number: u32,

    /// 1-indexed page the image was drawn on
    pub page: u32,

    /// Failures recorded while extracting this image
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,
}

impl ImageMetadata {
    pub fn new(
        content_type: impl Into<String>,
        resource_name: impl Into<String>,
        sequence_number: u32,
        page: u32,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            resource_name: resource_name.into(),
            embedded_resource_type: EmbeddedResourceType::Inline,
            sequence_number,
            page,
            exceptions: Vec::new(),
        }
    }

    /// Record a failure against this image.
    pub fn add_exception(&mut self, message: impl Into<String>) {
        self.exceptions.push(message.into());
    }

    pub fn has_exceptions(&self) -> bool {
        !self.exceptions.is_empty()
    }
}

/// An extracted image payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedImage {
    pub metadata: ImageMetadata,

    /// Encoded bytes in the format named by `metadata.content_type`
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    pub fn new(metadata: ImageMetadata, data: Vec<u8>) -> Self {
        Self { metadata, data }
    }

    /// Get the size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn file_name(&self) -> &str {
        &self.metadata.resource_name
    }

    /// Detect the MIME type from magic bytes.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }
        if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            return Some("image/tiff");
        }
        // JP2 signature box
        if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
            return Some("image/jp2");
        }
        if data.starts_with(&[0x97, 0x4A, 0x42, 0x32, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/x-jbig2");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults_to_inline() {
        let meta = ImageMetadata::new("image/png", "image0.png", 0, 1);
        assert_eq!(meta.embedded_resource_type, EmbeddedResourceType::Inline);
        assert_eq!(meta.embedded_resource_type.as_str(), "INLINE");
        assert!(!meta.has_exceptions());
    }

    #[test]
    fn test_metadata_serializes_resource_type() {
        let meta = ImageMetadata::new("image/jpeg", "image2.jpg", 2, 1);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"embedded_resource_type\":\"INLINE\""));
        assert!(!json.contains("exceptions"));
    }

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(
            EmbeddedImage::detect_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
        assert_eq!(
            EmbeddedImage::detect_mime_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some("image/png")
        );
        assert_eq!(EmbeddedImage::detect_mime_type(b"II*\0rest"), Some("image/tiff"));
        assert_eq!(EmbeddedImage::detect_mime_type(b"plain"), None);
    }

    #[test]
    fn test_payload_not_serialized() {
        let image = EmbeddedImage::new(ImageMetadata::new("image/png", "image0.png", 0, 1), vec![1, 2, 3]);
        assert_eq!(image.size(), 3);
        let json = serde_json::to_string(&image).unwrap();
        assert!(!json.contains("data"));
    }
}
