//! Processing options and configuration.

use std::ops::RangeInclusive;

/// Default cap on raw image payload size (100 MiB).
pub const MAX_IMAGE_LENGTH_BYTES: u64 = 100 * 1024 * 1024;

/// Default cap on line/rect primitives emitted for one page.
pub const DEFAULT_MAX_GRAPHICS_PRIMITIVES: usize = 1_000_000;

/// Options for laying out a document.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// How recoverable failures are handled
    pub catch_mode: CatchMode,

    /// Normalize rotated text by re-running layout once per glyph angle
    pub detect_angles: bool,

    /// Extract images drawn by page content
    pub extract_inline_images: bool,

    /// Skip images whose stream was already extracted in this document
    pub extract_unique_inline_images_only: bool,

    /// Emit line/rect hints from vector paths
    pub extract_vector_graphics: bool,

    /// Added to every y coordinate of vector primitives
    pub vertical_offset: f32,

    /// Maximum number of characters written for the document (None = unlimited)
    pub write_limit: Option<usize>,

    /// Maximum raw image payload in bytes
    pub max_image_bytes: u64,

    /// Maximum vector primitives per page
    pub max_graphics_primitives_per_page: usize,

    /// NFKC-normalize presentation-form ligatures
    pub normalize_ligatures: bool,

    /// Raise instead of logging when word bookkeeping diverges
    pub strict_word_invariants: bool,

    /// Pass JPEG streams through without re-encoding
    pub direct_jpeg: bool,

    /// Page selection (which pages to process)
    pub pages: PageSelection,
}

impl ParseOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set catch mode.
    pub fn with_catch_mode(mut self, mode: CatchMode) -> Self {
        self.catch_mode = mode;
        self
    }

    /// Collect recoverable failures as warnings and continue.
    pub fn lenient(mut self) -> Self {
        self.catch_mode = CatchMode::Accumulate;
        self
    }

    /// Propagate the first failure.
    pub fn fail_fast(mut self) -> Self {
        self.catch_mode = CatchMode::FailFast;
        self
    }

    pub fn with_detect_angles(mut self, detect: bool) -> Self {
        self.detect_angles = detect;
        self
    }

    pub fn with_inline_images(mut self, extract: bool) -> Self {
        self.extract_inline_images = extract;
        self
    }

    pub fn with_unique_images_only(mut self, unique: bool) -> Self {
        self.extract_unique_inline_images_only = unique;
        self
    }

    pub fn with_vector_graphics(mut self, extract: bool) -> Self {
        self.extract_vector_graphics = extract;
        self
    }

    pub fn with_vertical_offset(mut self, offset: f32) -> Self {
        self.vertical_offset = offset;
        self
    }

    /// Set the document character limit.
    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    pub fn with_max_image_bytes(mut self, bytes: u64) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    pub fn with_max_graphics_primitives(mut self, max: usize) -> Self {
        self.max_graphics_primitives_per_page = max;
        self
    }

    pub fn with_ligature_normalization(mut self, normalize: bool) -> Self {
        self.normalize_ligatures = normalize;
        self
    }

    pub fn with_strict_word_invariants(mut self, strict: bool) -> Self {
        self.strict_word_invariants = strict;
        self
    }

    pub fn with_direct_jpeg(mut self, direct: bool) -> Self {
        self.direct_jpeg = direct;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.pages = PageSelection::Range(range);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            catch_mode: CatchMode::Accumulate,
            detect_angles: false,
            extract_inline_images: false,
            extract_unique_inline_images_only: true,
            extract_vector_graphics: true,
            vertical_offset: 0.0,
            write_limit: None,
            max_image_bytes: MAX_IMAGE_LENGTH_BYTES,
            max_graphics_primitives_per_page: DEFAULT_MAX_GRAPHICS_PRIMITIVES,
            normalize_ligatures: true,
            strict_word_invariants: false,
            direct_jpeg: false,
            pages: PageSelection::All,
        }
    }
}

/// Handling of recoverable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatchMode {
    /// Record failures as warnings and keep going
    #[default]
    Accumulate,
    /// Stop at the first failure
    FailFast,
}

/// Page selection for processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Process all pages
    #[default]
    All,
    /// Process a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Process specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page(start)?;
                let end = parse_page(end)?;
                if start > end {
                    return Err(format!("Invalid page range: {}", s));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(parse_page(start)?..=parse_page(end)?),
                None => pages.push(parse_page(part)?),
            }
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("Invalid page number: {}", s.trim())),
        Ok(n) => Ok(n),
    }
}
