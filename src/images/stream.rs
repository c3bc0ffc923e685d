//! Partial decoding and bounded copying of image streams.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;

use crate::engine::{PdfImage, StreamFilter};
use crate::error::{Error, Result};

/// Open the image stream with its leading filters decoded.
///
/// Filters are applied in order until one listed in `stop` is reached;
/// the bytes from that point on are returned still encoded. Only
/// `FlateDecode` is decoded here. Any other filter before the stop point
/// is an [`Error::UnsupportedFilter`].
pub fn open_decoded<'a>(image: &'a dyn PdfImage, stop: &[StreamFilter]) -> Result<Box<dyn Read + 'a>> {
    let mut reader = image.encoded_stream()?;
    for filter in image.filters() {
        if stop.contains(filter) {
            break;
        }
        reader = match filter {
            StreamFilter::Flate => Box::new(ZlibDecoder::new(reader)),
            other => return Err(Error::UnsupportedFilter(other.name().to_string())),
        };
    }
    Ok(reader)
}

/// Copy at most `limit` bytes from `reader` to `writer`.
///
/// Fails with [`Error::ResourceLimitExceeded`] as soon as the stream turns
/// out to be longer than `limit`; the writer may then hold a prefix.
pub fn copy_up_to_max_length<R, W>(reader: R, writer: &mut W, limit: u64) -> Result<u64>
where
    R: Read,
    W: Write + ?Sized,
{
    let copied = io::copy(&mut reader.take(limit.saturating_add(1)), writer)?;
    if copied > limit {
        return Err(Error::ResourceLimitExceeded {
            what: "Image size".to_string(),
            limit,
        });
    }
    Ok(copied)
}

/// Read a whole stream into memory, bounded by `limit`.
pub fn read_bounded<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    copy_up_to_max_length(reader, &mut bytes, limit)?;
    Ok(bytes)
}
