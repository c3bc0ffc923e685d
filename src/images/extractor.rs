//! Extraction of images drawn by page content.

use image::ImageFormat;

use super::embedded::EmbeddedHandler;
use super::encode::{encode, encode_bitonal_tiff, format_for_suffix};
use super::stream::{open_decoded, read_bounded};
use crate::engine::{ColorSpace, PageGraphicsCallbacks, PdfImage, StreamFilter};
use crate::error::{Error, ErrorCollector, Result};
use crate::model::{Fragment, GraphicsState, ImageFragment, ImageMetadata};
use crate::options::{ParseOptions, MAX_IMAGE_LENGTH_BYTES};
use crate::orchestrator::{DocumentContext, ImageNumber};
use crate::render::MarkupSink;

/// Content type and normalized suffix for an engine-suggested suffix.
pub fn content_type_for(suffix: Option<&str>) -> (&'static str, &'static str) {
    match suffix {
        None | Some("png") => ("image/png", "png"),
        Some("jpg") => ("image/jpeg", "jpg"),
        Some("tiff") | Some("tif") => ("image/tiff", "tif"),
        Some("jpx") | Some("jp2") => ("image/jp2", "jp2"),
        Some("jb2") => ("image/x-jbig2", "jb2"),
        Some(other) => {
            log::debug!("Unknown image suffix {}, extracting as png", other);
            ("image/png", "png")
        }
    }
}

/// Extraction settings taken from [`ParseOptions`].
#[derive(Debug, Clone, Copy)]
pub struct ExtractSettings {
    pub unique_only: bool,
    pub direct_jpeg: bool,
    pub max_image_bytes: u64,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            unique_only: true,
            direct_jpeg: false,
            max_image_bytes: MAX_IMAGE_LENGTH_BYTES,
        }
    }
}

impl From<&ParseOptions> for ExtractSettings {
    fn from(options: &ParseOptions) -> Self {
        Self {
            unique_only: options.extract_unique_inline_images_only,
            direct_jpeg: options.direct_jpeg,
            max_image_bytes: options.max_image_bytes,
        }
    }
}

/// Emits an `img` fragment per image draw and hands the bytes to an
/// [`EmbeddedHandler`].
pub struct ImageExtractor<'a> {
    page: u32,
    settings: ExtractSettings,
    context: &'a mut DocumentContext,
    sink: &'a mut dyn MarkupSink,
    handler: &'a mut dyn EmbeddedHandler,
    errors: &'a mut ErrorCollector,
}

impl<'a> ImageExtractor<'a> {
    pub fn new(
        page: u32,
        settings: ExtractSettings,
        context: &'a mut DocumentContext,
        sink: &'a mut dyn MarkupSink,
        handler: &'a mut dyn EmbeddedHandler,
        errors: &'a mut ErrorCollector,
    ) -> Self {
        Self {
            page,
            settings,
            context,
            sink,
            handler,
            errors,
        }
    }

    fn process_image(&mut self, image: &dyn PdfImage) -> Result<()> {
        if image.is_stencil() {
            log::trace!("Stencil mask on page {} painted as an image", self.page);
        }

        let number = match self.context.image_number(image.stream_id()) {
            ImageNumber::Seen(_) if self.settings.unique_only => return Ok(()),
            number => number.value(),
        };

        let suffix = if image.has_mask() || image.has_soft_mask() {
            Some("png")
        } else {
            image.suffix()
        };
        let (content_type, suffix) = content_type_for(suffix);

        let fragment = ImageFragment::new(number, suffix);
        let mut metadata = ImageMetadata::new(content_type, fragment.file_name(), number, self.page);
        self.sink.emit(Fragment::Image(fragment))?;

        let mut failure = None;
        if self.handler.should_parse_embedded(&metadata) {
            let extracted = extract_bytes(image, suffix, &self.settings)
                .and_then(|bytes| match bytes {
                    Some(bytes) => self.handler.parse_embedded(&bytes, &metadata),
                    None => {
                        log::debug!("No raster for {}", metadata.resource_name);
                        Ok(())
                    }
                });
            if let Err(e) = extracted {
                metadata.add_exception(e.to_string());
                failure = Some(e);
            }
        }

        self.context.record_image(metadata);
        match failure {
            Some(e) if e.is_resource_limit() => self.errors.handle(e),
            Some(e) => {
                self.errors.record(e);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl PageGraphicsCallbacks for ImageExtractor<'_> {
    fn on_image(&mut self, image: &dyn PdfImage, _gs: &GraphicsState) -> Result<()> {
        self.process_image(image)
    }
}

/// Produce the bytes written for an image with the given normalized suffix.
///
/// `Ok(None)` means the engine could not decode the image to a raster.
pub fn extract_bytes(
    image: &dyn PdfImage,
    suffix: &str,
    settings: &ExtractSettings,
) -> Result<Option<Vec<u8>>> {
    let color_space = image.color_space();
    let masked = image.has_mask() || image.has_soft_mask();
    let limit = settings.max_image_bytes;

    match suffix {
        "jpg" if settings.direct_jpeg || color_space.is_gray_or_rgb() => {
            passthrough(image, StreamFilter::Dct, limit).map(Some)
        }
        "jpg" => reencode(image, ImageFormat::Jpeg, limit),
        "jp2" if settings.direct_jpeg || (!masked && color_space.is_gray_or_rgb()) => {
            passthrough(image, StreamFilter::Jpx, limit).map(Some)
        }
        "jp2" => Err(Error::MissingImageWriter("jpeg2000".to_string())),
        "jb2" => passthrough(image, StreamFilter::Jbig2, limit).map(Some),
        "tif" if color_space == ColorSpace::DeviceGray => match image.decode()? {
            Some(raster) => bounded(encode_bitonal_tiff(&raster)?, limit).map(Some),
            None => Ok(None),
        },
        other => reencode(image, format_for_suffix(other)?, limit),
    }
}

fn passthrough(image: &dyn PdfImage, stop: StreamFilter, limit: u64) -> Result<Vec<u8>> {
    read_bounded(open_decoded(image, &[stop])?, limit)
}

fn reencode(image: &dyn PdfImage, format: ImageFormat, limit: u64) -> Result<Option<Vec<u8>>> {
    match image.decode()? {
        Some(raster) => bounded(encode(&raster, format)?, limit).map(Some),
        None => Ok(None),
    }
}

fn bounded(bytes: Vec<u8>, limit: u64) -> Result<Vec<u8>> {
    if bytes.len() as u64 > limit {
        return Err(Error::ResourceLimitExceeded {
            what: "Image size".to_string(),
            limit,
        });
    }
    Ok(bytes)
}
