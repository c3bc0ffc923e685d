//! Images as reported by the engine's image-draw callback.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Object identity of a stream: (object number, generation number).
pub type StreamId = (u32, u16);

/// Color space of an image, as far as extraction cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    Indexed,
    IccBased,
    Other(String),
}

impl ColorSpace {
    pub fn from_name(name: &str) -> Self {
        match name {
            "DeviceGray" | "G" => ColorSpace::DeviceGray,
            "DeviceRGB" | "RGB" => ColorSpace::DeviceRgb,
            "DeviceCMYK" | "CMYK" => ColorSpace::DeviceCmyk,
            "Indexed" | "I" => ColorSpace::Indexed,
            "ICCBased" => ColorSpace::IccBased,
            other => ColorSpace::Other(other.to_string()),
        }
    }

    /// Gray and RGB images can be passed through without conversion.
    pub fn is_gray_or_rgb(&self) -> bool {
        matches!(self, ColorSpace::DeviceGray | ColorSpace::DeviceRgb)
    }
}

/// A stream filter, as named in the stream's `/Filter` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StreamFilter {
    Flate,
    Lzw,
    AsciiHex,
    Ascii85,
    RunLength,
    CcittFax,
    Dct,
    Jpx,
    Jbig2,
    Crypt,
    Other(String),
}

impl StreamFilter {
    /// Parse a filter name, including inline-image abbreviations.
    pub fn from_name(name: &str) -> Self {
        match name.trim_start_matches('/') {
            "FlateDecode" | "Fl" => StreamFilter::Flate,
            "LZWDecode" | "LZW" => StreamFilter::Lzw,
            "ASCIIHexDecode" | "AHx" => StreamFilter::AsciiHex,
            "ASCII85Decode" | "A85" => StreamFilter::Ascii85,
            "RunLengthDecode" | "RL" => StreamFilter::RunLength,
            "CCITTFaxDecode" | "CCF" => StreamFilter::CcittFax,
            "DCTDecode" | "DCT" => StreamFilter::Dct,
            "JPXDecode" => StreamFilter::Jpx,
            "JBIG2Decode" => StreamFilter::Jbig2,
            "Crypt" => StreamFilter::Crypt,
            other => StreamFilter::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StreamFilter::Flate => "FlateDecode",
            StreamFilter::Lzw => "LZWDecode",
            StreamFilter::AsciiHex => "ASCIIHexDecode",
            StreamFilter::Ascii85 => "ASCII85Decode",
            StreamFilter::RunLength => "RunLengthDecode",
            StreamFilter::CcittFax => "CCITTFaxDecode",
            StreamFilter::Dct => "DCTDecode",
            StreamFilter::Jpx => "JPXDecode",
            StreamFilter::Jbig2 => "JBIG2Decode",
            StreamFilter::Crypt => "Crypt",
            StreamFilter::Other(name) => name,
        }
    }

    /// File suffix implied by an image's final filter.
    pub fn image_suffix(filters: &[StreamFilter]) -> &'static str {
        match filters.last() {
            Some(StreamFilter::Dct) => "jpg",
            Some(StreamFilter::Jpx) => "jpx",
            Some(StreamFilter::CcittFax) => "tiff",
            Some(StreamFilter::Jbig2) => "jb2",
            _ => "png",
        }
    }
}

impl From<String> for StreamFilter {
    fn from(name: String) -> Self {
        StreamFilter::from_name(&name)
    }
}

impl From<StreamFilter> for String {
    fn from(filter: StreamFilter) -> Self {
        filter.name().to_string()
    }
}

/// An image drawn by the page content.
pub trait PdfImage {
    /// Identity of the backing stream; `None` for inline images.
    fn stream_id(&self) -> Option<StreamId>;

    /// Suffix the engine suggests (`png`, `jpg`, `tiff`, `jpx`, `jb2`).
    fn suffix(&self) -> Option<&str> {
        Some(StreamFilter::image_suffix(self.filters()))
    }

    fn color_space(&self) -> ColorSpace;

    fn has_mask(&self) -> bool {
        false
    }

    fn has_soft_mask(&self) -> bool {
        false
    }

    /// Image mask painted with the current fill color.
    fn is_stencil(&self) -> bool {
        false
    }

    /// Filter chain, in decode order.
    fn filters(&self) -> &[StreamFilter];

    /// The stream bytes with no filters applied.
    fn encoded_stream(&self) -> Result<Box<dyn Read + '_>>;

    /// Decode to a raster; `None` when the engine cannot produce one.
    fn decode(&self) -> Result<Option<image::DynamicImage>>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;
}
