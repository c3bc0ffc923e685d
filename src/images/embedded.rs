//! Consumers of extracted image bytes.

use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::{EmbeddedImage, ImageMetadata};

/// Decides whether extracted images are wanted, and receives their bytes.
pub trait EmbeddedHandler {
    /// Called before extraction; returning `false` skips the byte copy.
    fn should_parse_embedded(&self, _metadata: &ImageMetadata) -> bool {
        true
    }

    fn parse_embedded(&mut self, data: &[u8], metadata: &ImageMetadata) -> Result<()>;
}

/// Keeps every extracted image in memory.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    images: Vec<EmbeddedImage>,
}

impl CollectingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[EmbeddedImage] {
        &self.images
    }

    pub fn into_images(self) -> Vec<EmbeddedImage> {
        self.images
    }
}

impl EmbeddedHandler for CollectingHandler {
    fn parse_embedded(&mut self, data: &[u8], metadata: &ImageMetadata) -> Result<()> {
        self.images
            .push(EmbeddedImage::new(metadata.clone(), data.to_vec()));
        Ok(())
    }
}

/// Accepts nothing; images are still referenced in the markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipHandler;

impl EmbeddedHandler for SkipHandler {
    fn should_parse_embedded(&self, _metadata: &ImageMetadata) -> bool {
        false
    }

    fn parse_embedded(&mut self, _data: &[u8], _metadata: &ImageMetadata) -> Result<()> {
        Ok(())
    }
}

/// Writes each image to `<dir>/<resource name>`.
#[derive(Debug)]
pub struct DirectoryHandler {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectoryHandler {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Files written so far, in extraction order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl EmbeddedHandler for DirectoryHandler {
    fn parse_embedded(&mut self, data: &[u8], metadata: &ImageMetadata) -> Result<()> {
        let path = self.dir.join(&metadata.resource_name);
        fs::write(&path, data)?;
        log::debug!("Wrote {} ({} bytes)", path.display(), data.len());
        self.written.push(path);
        Ok(())
    }
}
