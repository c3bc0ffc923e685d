//! Error types for pdflayout.

use std::io;
use thiserror::Error;

use crate::options::CatchMode;

/// Result type alias for pdflayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while laying out a document.
///
/// Most variants describe a single failed operation (one glyph run, one path,
/// one image) and are recoverable under [`CatchMode::Accumulate`]. The write
/// limit is the exception: it always aborts the document.
///
/// [`CatchMode::Accumulate`]: crate::options::CatchMode::Accumulate
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a stream or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A content or image stream could not be read.
    #[error("Unable to read stream: {0}")]
    StreamRead(String),

    /// A glyph or font metric needed for layout was missing.
    #[error("Missing metric: {0}")]
    MissingMetric(String),

    /// The external content-stream engine reported a failure.
    #[error("Content stream engine error: {0}")]
    Engine(String),

    /// A stream filter the crate cannot decode.
    #[error("Unsupported stream filter: {0}")]
    UnsupportedFilter(String),

    /// An image could not be decoded to a raster.
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// An image raster could not be encoded.
    #[error("Image encoding error: {0}")]
    ImageEncode(String),

    /// No encoder exists for the requested image format.
    #[error("No image writer available for format: {0}")]
    MissingImageWriter(String),

    /// A bounded resource (image payload size) was exceeded.
    #[error("{what} is larger than allowed ({limit})")]
    ResourceLimitExceeded {
        /// What exceeded the bound.
        what: String,
        /// The configured bound.
        limit: u64,
    },

    /// The document produced more text than the configured write limit.
    #[error("Your document contained more than {0} characters, and so your requested limit has been reached")]
    WriteLimitReached(usize),

    /// An internal bookkeeping invariant did not hold.
    #[error("Structural inconsistency: {0}")]
    StructuralInconsistency(String),

    /// Page number is not known to the engine.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error during serialization (XHTML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error aborts the document regardless of catch mode.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::WriteLimitReached(_))
    }

    /// Whether this error came from a resource bound.
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            Error::ResourceLimitExceeded { .. } | Error::WriteLimitReached(_)
        )
    }
}

/// Applies a [`CatchMode`] to failures as they happen.
///
/// Fatal errors and every error under `FailFast` are handed back to the
/// caller; anything else is logged and kept in order.
///
/// [`CatchMode`]: crate::options::CatchMode
#[derive(Debug)]
pub struct ErrorCollector {
    mode: CatchMode,
    errors: Vec<Error>,
}

impl ErrorCollector {
    pub fn new(mode: CatchMode) -> Self {
        Self {
            mode,
            errors: Vec::new(),
        }
    }

    pub fn mode(&self) -> CatchMode {
        self.mode
    }

    /// Record `err`, or return it if it must propagate.
    pub fn handle(&mut self, err: Error) -> Result<()> {
        if err.is_fatal() || self.mode == CatchMode::FailFast {
            return Err(err);
        }
        log::warn!("Recovered from error: {}", err);
        self.errors.push(err);
        Ok(())
    }

    /// Keep `err` without ever propagating it. Under `FailFast` it is only
    /// logged.
    pub fn record(&mut self, err: Error) {
        log::warn!("Recovered from error: {}", err);
        if self.mode == CatchMode::Accumulate {
            self.errors.push(err);
        }
    }

    /// Run `f`, routing its failure through [`handle`](Self::handle).
    pub fn guard<T>(&mut self, f: impl FnOnce() -> Result<T>) -> Result<Option<T>> {
        match f() {
            Ok(v) => Ok(Some(v)),
            Err(e) => self.handle(e).map(|_| None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Take the recorded errors, oldest first.
    pub fn drain(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            image::ImageError::Decoding(_) => Error::ImageDecode(err.to_string()),
            image::ImageError::Unsupported(_) => Error::MissingImageWriter(err.to_string()),
            _ => Error::ImageEncode(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(err.to_string())
    }
}
