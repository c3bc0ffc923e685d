//! Vector path interpretation.
//!
//! [`PathTracker`] follows the path operators of one page and turns the
//! straight segments and rectangles it sees into `line` and `rect`
//! fragments. These are hints for later table detection, not a rendering:
//! curves only move the current point, clipping paths are not applied, and
//! the CTM is ignored.
//!
//! State is constant-size. Fragments go straight to the sink, bounded per
//! page by `max_graphics_primitives_per_page`.

use super::style::resolve_style;
use crate::engine::{PageGraphicsCallbacks, PageInfo, PaintMode, PdfImage, WindingRule};
use crate::error::Result;
use crate::model::{Fragment, GraphicsState, LineFragment, Point, RectFragment};
use crate::options::{ParseOptions, DEFAULT_MAX_GRAPHICS_PRIMITIVES};
use crate::render::MarkupSink;

/// Path bookkeeping between two resets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathState {
    pub current: Point,
    /// Current point before the first edge since the last reset
    pub start: Option<Point>,
    pub edge_count: u32,
    pub fill: Option<Vec<f32>>,
    pub stroke: Option<Vec<f32>>,
    pub clip_rule: Option<WindingRule>,
}

impl PathState {
    fn clear_colors(&mut self) {
        self.fill = None;
        self.stroke = None;
    }

    fn reset_edges(&mut self) {
        self.start = None;
        self.edge_count = 0;
    }
}

/// Emits line and rectangle hints for one page.
pub struct PathTracker<'a> {
    page: PageInfo,
    offset_y: f32,
    sink: &'a mut dyn MarkupSink,
    state: PathState,
    max_primitives: usize,
    emitted: usize,
    dropped: usize,
}

impl<'a> PathTracker<'a> {
    pub fn new(page: PageInfo, sink: &'a mut dyn MarkupSink) -> Self {
        Self {
            page,
            offset_y: 0.0,
            sink,
            state: PathState::default(),
            max_primitives: DEFAULT_MAX_GRAPHICS_PRIMITIVES,
            emitted: 0,
            dropped: 0,
        }
    }

    pub fn from_options(page: PageInfo, sink: &'a mut dyn MarkupSink, options: &ParseOptions) -> Self {
        Self::new(page, sink)
            .with_vertical_offset(options.vertical_offset)
            .with_max_primitives(options.max_graphics_primitives_per_page)
    }

    pub fn with_vertical_offset(mut self, offset: f32) -> Self {
        self.offset_y = offset;
        self
    }

    pub fn with_max_primitives(mut self, max: usize) -> Self {
        self.max_primitives = max;
        self
    }

    pub fn state(&self) -> &PathState {
        &self.state
    }

    /// Primitives written to the sink.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Primitives discarded after the page cap was reached.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn move_to(&mut self, p: Point) {
        self.state.current = p;
    }

    /// Draws an edge from the current point. Zero-width edges are invisible
    /// and leave the path state untouched.
    pub fn line_to(&mut self, p: Point, gs: &GraphicsState) -> Result<()> {
        if gs.line_width <= 0.0 {
            return Ok(());
        }
        self.emit_line(self.state.current, p, gs)?;
        if self.state.edge_count == 0 {
            self.state.start = Some(self.state.current);
        }
        self.state.current = p;
        self.state.edge_count += 1;
        Ok(())
    }

    pub fn curve_to(&mut self, end: Point) {
        self.state.current = end;
    }

    pub fn append_rectangle(&mut self, corners: [Point; 4], gs: &GraphicsState) -> Result<()> {
        if gs.line_width <= 0.0 {
            return Ok(());
        }
        let [p0, p1, _, p3] = corners;
        let rect = RectFragment {
            x: p3.x,
            y: self.page.media_box.height() - p3.y + self.offset_y,
            width: (p1.x - p0.x).abs(),
            height: (p1.y - p3.y).abs(),
            style: self.style(gs),
        };
        self.emit(Fragment::Rect(rect))
    }

    pub fn close_path(&mut self) {
        self.state.clear_colors();
        self.state.reset_edges();
    }

    /// Ends the path; a path of exactly three edges gets its closing edge.
    pub fn end_path(&mut self, gs: &GraphicsState) -> Result<()> {
        self.state.clear_colors();
        if self.state.edge_count == 3 {
            if let Some(start) = self.state.start {
                self.emit_line(self.state.current, start, gs)?;
            }
        }
        self.state.reset_edges();
        Ok(())
    }

    pub fn paint(&mut self, mode: PaintMode, gs: &GraphicsState) {
        let color = gs.non_stroking_color.components.clone();
        match mode {
            PaintMode::Stroke => {
                self.state.stroke = Some(color);
                self.state.fill = None;
            }
            PaintMode::Fill(_) => {
                self.state.fill = Some(color);
                self.state.stroke = None;
            }
            PaintMode::FillAndStroke(_) => {
                self.state.stroke = Some(color.clone());
                self.state.fill = Some(color);
            }
        }
    }

    pub fn clip(&mut self, rule: WindingRule) {
        self.state.clip_rule = Some(rule);
    }

    fn style(&self, gs: &GraphicsState) -> crate::model::StrokeStyle {
        resolve_style(self.state.fill.as_deref(), self.state.stroke.as_deref(), gs)
    }

    fn emit_line(&mut self, from: Point, to: Point, gs: &GraphicsState) -> Result<()> {
        let height = self.page.view_box().height();
        let line = LineFragment {
            x1: from.x,
            y1: height - from.y + self.offset_y,
            x2: to.x,
            y2: height - to.y + self.offset_y,
            style: self.style(gs),
        };
        self.emit(Fragment::Line(line))
    }

    fn emit(&mut self, fragment: Fragment) -> Result<()> {
        if self.emitted >= self.max_primitives {
            if self.dropped == 0 {
                log::warn!(
                    "Page {}: more than {} vector primitives, dropping the rest",
                    self.page.number,
                    self.max_primitives
                );
            }
            self.dropped += 1;
            return Ok(());
        }
        self.emitted += 1;
        self.sink.emit(fragment)
    }
}

impl PageGraphicsCallbacks for PathTracker<'_> {
    fn on_move_to(&mut self, p: Point, _gs: &GraphicsState) -> Result<()> {
        self.move_to(p);
        Ok(())
    }

    fn on_line_to(&mut self, p: Point, gs: &GraphicsState) -> Result<()> {
        self.line_to(p, gs)
    }

    fn on_curve_to(&mut self, _c1: Point, _c2: Point, end: Point, _gs: &GraphicsState) -> Result<()> {
        self.curve_to(end);
        Ok(())
    }

    fn on_rect(&mut self, corners: [Point; 4], gs: &GraphicsState) -> Result<()> {
        self.append_rectangle(corners, gs)
    }

    fn on_close_path(&mut self, _gs: &GraphicsState) -> Result<()> {
        self.close_path();
        Ok(())
    }

    fn on_end_path(&mut self, gs: &GraphicsState) -> Result<()> {
        self.end_path(gs)
    }

    fn on_paint(&mut self, mode: PaintMode, gs: &GraphicsState) -> Result<()> {
        self.paint(mode, gs);
        Ok(())
    }

    fn on_clip(&mut self, rule: WindingRule, _gs: &GraphicsState) -> Result<()> {
        self.clip(rule);
        Ok(())
    }

    fn on_image(&mut self, image: &dyn PdfImage, _gs: &GraphicsState) -> Result<()> {
        log::debug!(
            "Ignoring {}x{} image in path tracking",
            image.width(),
            image.height()
        );
        Ok(())
    }

    fn on_shading(&mut self, name: &str, _gs: &GraphicsState) -> Result<()> {
        log::debug!("Ignoring shading fill {}", name);
        Ok(())
    }
}
