//! A recorded content-stream trace that replays as an engine.
//!
//! `RecordedDocument` is the serde form of everything an engine would report
//! for a document: page geometry, glyph runs, and graphics operators. It is
//! what the CLI reads and what the integration tests build by hand.
//!
//! ```json
//! {
//!   "pages": [{
//!     "number": 1,
//!     "media_box": { "llx": 0, "lly": 0, "urx": 612, "ury": 792 },
//!     "text": [{ "glyphs": [ ... ] }],
//!     "graphics": [{ "op": "move_to", "x": 10, "y": 10 }, { "op": "line_to", "x": 50, "y": 10 }]
//!   }]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use super::{
    ColorSpace, ContentStreamEngine, PageGraphicsCallbacks, PageInfo, PageTextCallbacks,
    PaintMode, PdfImage, StreamFilter, StreamId, WindingRule,
};
use crate::error::{Error, Result};
use crate::images::stream::{open_decoded, read_bounded};
use crate::options::MAX_IMAGE_LENGTH_BYTES;
use crate::model::{Color, GlyphPosition, GraphicsState, Matrix, Point};

/// A document trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedDocument {
    pub pages: Vec<RecordedPage>,
}

/// The recorded content of one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedPage {
    #[serde(flatten)]
    pub info: PageInfo,

    /// Text-show operations in content order
    #[serde(default)]
    pub text: Vec<TextOp>,

    /// Graphics operators in content order
    #[serde(default)]
    pub graphics: Vec<GraphicsOp>,

    /// Operators of each soft-mask transparency group
    #[serde(default)]
    pub soft_mask_groups: Vec<Vec<GraphicsOp>>,

    #[serde(skip)]
    prepended: Vec<Matrix>,
}

/// A text pass event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOp {
    Run {
        /// Defaults to the concatenated glyph text
        #[serde(default)]
        text: Option<String>,
        glyphs: Vec<GlyphPosition>,
    },
    Boundary { paragraph_boundary: bool },
}

/// A graphics pass operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GraphicsOp {
    /// Replace the whole graphics state
    SetState { state: GraphicsState },
    /// `w`
    SetLineWidth { width: f32 },
    /// `G`, `RG`, `K`
    SetStrokeColor { components: Vec<f32> },
    /// `g`, `rg`, `k`
    SetFillColor { components: Vec<f32> },
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    CurveTo { x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32 },
    /// `re`, as origin plus size
    Rect { x: f32, y: f32, width: f32, height: f32 },
    ClosePath,
    EndPath,
    Stroke,
    Fill {
        #[serde(default)]
        rule: WindingRule,
    },
    FillAndStroke {
        #[serde(default)]
        rule: WindingRule,
    },
    Clip {
        #[serde(default)]
        rule: WindingRule,
    },
    Image(RecordedImage),
    Shading { name: String },
}

/// An image draw with its stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedImage {
    #[serde(default)]
    pub stream_id: Option<StreamId>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default = "default_color_space")]
    pub color_space: ColorSpace,
    #[serde(default)]
    pub has_mask: bool,
    #[serde(default)]
    pub has_soft_mask: bool,
    #[serde(default)]
    pub is_stencil: bool,
    /// Filter chain in decode order
    #[serde(default)]
    pub filters: Vec<StreamFilter>,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_bits_per_component")]
    pub bits_per_component: u8,
    /// Encoded stream bytes
    #[serde(default)]
    pub data: Vec<u8>,
    /// Decoded samples, when the trace carries them
    #[serde(default)]
    pub pixels: Option<Vec<u8>>,
}

fn default_color_space() -> ColorSpace {
    ColorSpace::DeviceRgb
}

fn default_bits_per_component() -> u8 {
    8
}

impl RecordedDocument {
    pub fn new(pages: Vec<RecordedPage>) -> Self {
        Self { pages }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Engine(format!("invalid trace: {}", e)))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| Error::Engine(format!("invalid trace: {}", e)))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn page(&self, number: u32) -> Result<&RecordedPage> {
        self.pages
            .iter()
            .find(|p| p.info.number == number)
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))
    }

    fn page_mut(&mut self, number: u32) -> Result<&mut RecordedPage> {
        let count = self.pages.len() as u32;
        self.pages
            .iter_mut()
            .find(|p| p.info.number == number)
            .ok_or(Error::PageOutOfRange(number, count))
    }
}

impl RecordedPage {
    pub fn new(info: PageInfo) -> Self {
        Self {
            info,
            text: Vec::new(),
            graphics: Vec::new(),
            soft_mask_groups: Vec::new(),
            prepended: Vec::new(),
        }
    }

    pub fn with_run(mut self, glyphs: Vec<GlyphPosition>) -> Self {
        self.text.push(TextOp::Run { text: None, glyphs });
        self
    }

    pub fn with_graphics(mut self, ops: Vec<GraphicsOp>) -> Self {
        self.graphics.extend(ops);
        self
    }

    pub fn with_soft_mask_group(mut self, ops: Vec<GraphicsOp>) -> Self {
        self.soft_mask_groups.push(ops);
        self
    }

    fn content_transform(&self) -> Option<Matrix> {
        self.prepended
            .iter()
            .copied()
            .reduce(|acc, m| acc.multiply(&m))
    }
}

impl RecordedImage {
    pub fn new(width: u32, height: u32, color_space: ColorSpace, filters: &[&str], data: Vec<u8>) -> Self {
        Self {
            stream_id: None,
            suffix: None,
            color_space,
            has_mask: false,
            has_soft_mask: false,
            is_stencil: false,
            filters: filters.iter().map(|f| StreamFilter::from_name(f)).collect(),
            width,
            height,
            bits_per_component: 8,
            data,
            pixels: None,
        }
    }

    pub fn with_stream_id(mut self, id: StreamId) -> Self {
        self.stream_id = Some(id);
        self
    }

    pub fn with_pixels(mut self, pixels: Vec<u8>) -> Self {
        self.pixels = Some(pixels);
        self
    }

    pub fn with_soft_mask(mut self) -> Self {
        self.has_soft_mask = true;
        self
    }

    pub fn with_mask(mut self) -> Self {
        self.has_mask = true;
        self
    }

    /// Mark as an image mask painted in the fill color.
    pub fn as_stencil(mut self) -> Self {
        self.is_stencil = true;
        self
    }

    fn raster_from_samples(&self, samples: Vec<u8>) -> Result<Option<DynamicImage>> {
        let (w, h) = (self.width, self.height);
        let raster = match (&self.color_space, self.bits_per_component) {
            (ColorSpace::DeviceGray, 1) if w == 0 || h == 0 => None,
            (ColorSpace::DeviceGray, 1) => {
                let row_bytes = (w as usize).div_ceil(8);
                let packed = row_bytes
                    .checked_mul(h as usize)
                    .ok_or_else(|| Error::ImageDecode(format!("{}x{} image is too large", w, h)))?;
                if samples.len() < packed {
                    return Err(Error::ImageDecode(format!(
                        "{}x{} bitmap needs {} bytes, got {}",
                        w,
                        h,
                        packed,
                        samples.len()
                    )));
                }
                let mut gray = Vec::with_capacity(packed.saturating_mul(8));
                for row in samples.chunks(row_bytes).take(h as usize) {
                    for x in 0..w as usize {
                        let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
                        gray.push(if bit == 1 { 255 } else { 0 });
                    }
                }
                GrayImage::from_raw(w, h, gray).map(DynamicImage::ImageLuma8)
            }
            (ColorSpace::DeviceGray, 8) => {
                GrayImage::from_raw(w, h, samples).map(DynamicImage::ImageLuma8)
            }
            (ColorSpace::DeviceRgb, 8) => RgbImage::from_raw(w, h, samples).map(DynamicImage::ImageRgb8),
            (ColorSpace::DeviceCmyk, 8) => {
                let rgb = samples
                    .chunks_exact(4)
                    .flat_map(|cmyk| {
                        let k = 255 - cmyk[3] as u16;
                        [
                            ((255 - cmyk[0] as u16) * k / 255) as u8,
                            ((255 - cmyk[1] as u16) * k / 255) as u8,
                            ((255 - cmyk[2] as u16) * k / 255) as u8,
                        ]
                    })
                    .collect();
                RgbImage::from_raw(w, h, rgb).map(DynamicImage::ImageRgb8)
            }
            _ => None,
        };
        Ok(raster)
    }
}

impl PdfImage for RecordedImage {
    fn stream_id(&self) -> Option<StreamId> {
        self.stream_id
    }

    fn suffix(&self) -> Option<&str> {
        match &self.suffix {
            Some(s) => Some(s.as_str()),
            None => Some(StreamFilter::image_suffix(self.filters())),
        }
    }

    fn color_space(&self) -> ColorSpace {
        self.color_space.clone()
    }

    fn has_mask(&self) -> bool {
        self.has_mask
    }

    fn has_soft_mask(&self) -> bool {
        self.has_soft_mask
    }

    fn is_stencil(&self) -> bool {
        self.is_stencil
    }

    fn filters(&self) -> &[StreamFilter] {
        &self.filters
    }

    fn encoded_stream(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }

    fn decode(&self) -> Result<Option<DynamicImage>> {
        if let Some(pixels) = &self.pixels {
            return self.raster_from_samples(pixels.clone());
        }

        match self.filters().last() {
            Some(StreamFilter::Dct) => {
                let bytes = read_bounded(open_decoded(self, &[StreamFilter::Dct])?, MAX_IMAGE_LENGTH_BYTES)?;
                let raster = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)?;
                Ok(Some(raster))
            }
            _ if self.filters().iter().all(|f| *f == StreamFilter::Flate) => {
                let samples = read_bounded(open_decoded(self, &[])?, MAX_IMAGE_LENGTH_BYTES)?;
                self.raster_from_samples(samples)
            }
            _ => Ok(None),
        }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

fn transform_glyph(glyph: &GlyphPosition, m: &Matrix) -> GlyphPosition {
    let start = m.transform_point(glyph.x, glyph.y);
    let end = m.transform_point(glyph.end_x, glyph.end_y);
    GlyphPosition {
        x: start.x,
        y: start.y,
        end_x: end.x,
        end_y: end.y,
        text_matrix: glyph.text_matrix.multiply(m),
        ..glyph.clone()
    }
}

fn replay_graphics(
    ops: &[GraphicsOp],
    transform: Option<Matrix>,
    callbacks: &mut dyn PageGraphicsCallbacks,
) -> Result<()> {
    let mut gs = GraphicsState::default();
    if let Some(m) = transform {
        gs.ctm = gs.ctm.multiply(&m);
    }

    for op in ops {
        match op {
            GraphicsOp::SetState { state } => {
                gs = state.clone();
                if let Some(m) = transform {
                    gs.ctm = gs.ctm.multiply(&m);
                }
            }
            GraphicsOp::SetLineWidth { width } => gs.line_width = *width,
            GraphicsOp::SetStrokeColor { components } => {
                gs.stroking_color = Color::new(components.clone())
            }
            GraphicsOp::SetFillColor { components } => {
                gs.non_stroking_color = Color::new(components.clone())
            }
            GraphicsOp::MoveTo { x, y } => callbacks.on_move_to(Point::new(*x, *y), &gs)?,
            GraphicsOp::LineTo { x, y } => callbacks.on_line_to(Point::new(*x, *y), &gs)?,
            GraphicsOp::CurveTo { x1, y1, x2, y2, x3, y3 } => callbacks.on_curve_to(
                Point::new(*x1, *y1),
                Point::new(*x2, *y2),
                Point::new(*x3, *y3),
                &gs,
            )?,
            GraphicsOp::Rect { x, y, width, height } => {
                let corners = [
                    Point::new(*x, *y),
                    Point::new(x + width, *y),
                    Point::new(x + width, y + height),
                    Point::new(*x, y + height),
                ];
                callbacks.on_rect(corners, &gs)?
            }
            GraphicsOp::ClosePath => callbacks.on_close_path(&gs)?,
            GraphicsOp::EndPath => callbacks.on_end_path(&gs)?,
            GraphicsOp::Stroke => callbacks.on_paint(PaintMode::Stroke, &gs)?,
            GraphicsOp::Fill { rule } => callbacks.on_paint(PaintMode::Fill(*rule), &gs)?,
            GraphicsOp::FillAndStroke { rule } => {
                callbacks.on_paint(PaintMode::FillAndStroke(*rule), &gs)?
            }
            GraphicsOp::Clip { rule } => callbacks.on_clip(*rule, &gs)?,
            GraphicsOp::Image(image) => callbacks.on_image(image, &gs)?,
            GraphicsOp::Shading { name } => callbacks.on_shading(name, &gs)?,
        }
    }
    Ok(())
}

impl ContentStreamEngine for RecordedDocument {
    fn page_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.pages.iter().map(|p| p.info.number).collect();
        numbers.sort_unstable();
        numbers
    }

    fn page_info(&self, page: u32) -> Result<PageInfo> {
        Ok(self.page(page)?.info.clone())
    }

    fn set_page_rotation(&mut self, page: u32, rotation: u16) -> Result<()> {
        self.page_mut(page)?.info.rotation = rotation;
        Ok(())
    }

    fn prepend_transform(&mut self, page: u32, matrix: Matrix) -> Result<()> {
        self.page_mut(page)?.prepended.push(matrix);
        Ok(())
    }

    fn remove_prepended_transform(&mut self, page: u32) -> Result<()> {
        self.page_mut(page)?
            .prepended
            .pop()
            .map(|_| ())
            .ok_or_else(|| Error::Engine(format!("no prepended transform on page {}", page)))
    }

    fn process_text(&mut self, page: u32, callbacks: &mut dyn PageTextCallbacks) -> Result<()> {
        let page = self.page(page)?;
        let transform = page.content_transform();

        for op in &page.text {
            match op {
                TextOp::Run { text, glyphs } => {
                    let glyphs: Vec<GlyphPosition> = match &transform {
                        Some(m) => glyphs.iter().map(|g| transform_glyph(g, m)).collect(),
                        None => glyphs.clone(),
                    };
                    let text = match text {
                        Some(t) => t.clone(),
                        None => glyphs.iter().map(|g| g.unicode.as_str()).collect(),
                    };
                    callbacks.on_glyph_run(&text, &glyphs)?;
                }
                TextOp::Boundary { paragraph_boundary } => {
                    if *paragraph_boundary {
                        callbacks.on_paragraph_boundary()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn process_graphics(
        &mut self,
        page: u32,
        callbacks: &mut dyn PageGraphicsCallbacks,
    ) -> Result<()> {
        let page = self.page(page)?;
        replay_graphics(&page.graphics, page.content_transform(), callbacks)
    }

    fn process_soft_mask_groups(
        &mut self,
        page: u32,
        callbacks: &mut dyn PageGraphicsCallbacks,
    ) -> Result<()> {
        let page = self.page(page)?;
        for group in &page.soft_mask_groups {
            replay_graphics(group, page.content_transform(), callbacks)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontInfo, PageBox};

    #[derive(Default)]
    struct RunCounter {
        runs: Vec<String>,
        angles: Vec<i32>,
    }

    impl PageTextCallbacks for RunCounter {
        fn on_glyph_run(&mut self, text: &str, glyphs: &[GlyphPosition]) -> Result<()> {
            self.runs.push(text.to_string());
            self.angles.extend(glyphs.iter().map(|g| g.angle()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct OpCounter {
        moves: usize,
        lines: usize,
        rects: Vec<[Point; 4]>,
        line_widths: Vec<f32>,
    }

    impl PageGraphicsCallbacks for OpCounter {
        fn on_move_to(&mut self, _p: Point, _gs: &GraphicsState) -> Result<()> {
            self.moves += 1;
            Ok(())
        }

        fn on_line_to(&mut self, _p: Point, gs: &GraphicsState) -> Result<()> {
            self.lines += 1;
            self.line_widths.push(gs.line_width);
            Ok(())
        }

        fn on_rect(&mut self, corners: [Point; 4], _gs: &GraphicsState) -> Result<()> {
            self.rects.push(corners);
            Ok(())
        }
    }

    fn glyph(c: &str, x: f32) -> GlyphPosition {
        GlyphPosition::new(c, x, 100.0, 6.0, FontInfo::new("Helvetica"), 12.0)
    }

    #[test]
    fn test_trace_json_round_trip() {
        let json = r#"{
            "pages": [{
                "number": 1,
                "media_box": {"llx": 0, "lly": 0, "urx": 612, "ury": 792},
                "graphics": [
                    {"op": "set_line_width", "width": 2.0},
                    {"op": "move_to", "x": 10, "y": 10},
                    {"op": "line_to", "x": 50, "y": 10},
                    {"op": "rect", "x": 0, "y": 0, "width": 20, "height": 10},
                    {"op": "fill", "rule": "even_odd"}
                ]
            }]
        }"#;
        let mut doc = RecordedDocument::from_json(json).unwrap();
        assert_eq!(doc.page_numbers(), vec![1]);

        let mut counter = OpCounter::default();
        doc.process_graphics(1, &mut counter).unwrap();
        assert_eq!(counter.moves, 1);
        assert_eq!(counter.lines, 1);
        assert_eq!(counter.line_widths, vec![2.0]);
        assert_eq!(counter.rects[0][1], Point::new(20.0, 0.0));
        assert_eq!(counter.rects[0][3], Point::new(0.0, 10.0));
    }

    #[test]
    fn test_run_text_defaults_to_glyphs() {
        let page = RecordedPage::new(PageInfo::new(1, PageBox::letter()))
            .with_run(vec![glyph("H", 10.0), glyph("i", 16.0)]);
        let mut doc = RecordedDocument::new(vec![page]);

        let mut counter = RunCounter::default();
        doc.process_text(1, &mut counter).unwrap();
        assert_eq!(counter.runs, vec!["Hi".to_string()]);
    }

    #[test]
    fn test_prepended_rotation_applies_to_glyphs() {
        let mut rotated = glyph("R", 10.0);
        rotated.text_matrix = Matrix::rotation(90f32.to_radians());
        let page = RecordedPage::new(PageInfo::new(1, PageBox::letter())).with_run(vec![rotated]);
        let mut doc = RecordedDocument::new(vec![page]);

        doc.prepend_transform(1, Matrix::rotation((-90f32).to_radians()))
            .unwrap();
        let mut counter = RunCounter::default();
        doc.process_text(1, &mut counter).unwrap();
        assert_eq!(counter.angles, vec![0]);

        doc.remove_prepended_transform(1).unwrap();
        let mut counter = RunCounter::default();
        doc.process_text(1, &mut counter).unwrap();
        assert_eq!(counter.angles, vec![90]);
        assert!(doc.remove_prepended_transform(1).is_err());
    }

    #[test]
    fn test_unknown_page() {
        let doc = RecordedDocument::default();
        assert!(matches!(doc.page_info(3), Err(Error::PageOutOfRange(3, 0))));
    }

    #[test]
    fn test_raw_gray_samples_decode() {
        let image = RecordedImage::new(2, 1, ColorSpace::DeviceGray, &[], vec![0, 255]);
        let raster = image.decode().unwrap().unwrap();
        assert_eq!(image::GenericImageView::dimensions(&raster), (2, 1));
    }

    #[test]
    fn test_huge_bitmap_dimensions_are_a_decode_error() {
        let mut image = RecordedImage::new(70_000, 70_000, ColorSpace::DeviceGray, &[], Vec::new())
            .with_pixels(vec![0; 16]);
        image.bits_per_component = 1;
        assert!(matches!(image.decode(), Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_packed_bitmap_expands_to_gray() {
        let mut image = RecordedImage::new(3, 2, ColorSpace::DeviceGray, &[], Vec::new())
            .with_pixels(vec![0b1010_0000, 0b0100_0000]);
        image.bits_per_component = 1;
        let raster = image.decode().unwrap().unwrap().to_luma8();
        assert_eq!(raster.into_raw(), vec![255, 0, 255, 0, 255, 0]);
    }

    #[test]
    fn test_flate_samples_are_bounded() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(&vec![0u8; MAX_IMAGE_LENGTH_BYTES as usize + 1]).unwrap();
        let bomb = encoder.finish().unwrap();
        let image = RecordedImage::new(1, 1, ColorSpace::DeviceGray, &["FlateDecode"], bomb);
        assert!(matches!(
            image.decode(),
            Err(Error::ResourceLimitExceeded { .. })
        ));
    }
}
