//! Embedded image extraction.
//!
//! Images are numbered per document, referenced from the page markup as
//! `img` fragments, and their bytes are passed through or re-encoded
//! before they reach an [`EmbeddedHandler`].

mod embedded;
mod encode;
mod extractor;
pub mod stream;

pub use embedded::{CollectingHandler, DirectoryHandler, EmbeddedHandler, SkipHandler};
pub use encode::{encode, encode_bitonal_tiff, format_for_suffix, to_bitonal};
pub use extractor::{content_type_for, extract_bytes, ExtractSettings, ImageExtractor};
pub use stream::{copy_up_to_max_length, open_decoded, read_bounded};
