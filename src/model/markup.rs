//! Markup fragments emitted by the layout components.
//!
//! Every fragment maps to one element in the page output: `p` for text
//! spans, `line` and `rect` for vector hints, and `img` for drawn images.
//! The attribute strings are part of the contract with downstream structure
//! consumers, so their formatting is kept byte-stable.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Point;

/// Format a float with shortest round-trip precision, keeping a `.0` on
/// integral values so the value always reads back as a float.
pub fn format_float(value: f32) -> String {
    if !value.is_finite() || value.fract() != 0.0 {
        format!("{}", value)
    } else if value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{:?}", value)
    }
}

/// Font attributes of one word, snapshotted from its first glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFont {
    pub family: String,
    pub weight: String,
    pub style: String,
    /// Device-scaled size
    pub size: f32,
    pub size_pt: f32,
    pub space_width: f32,
}

impl fmt::Display for WordFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{},{},{},{})",
            self.family,
            self.weight,
            self.style,
            format_float(self.size),
            format_float(self.size_pt),
            format_float(self.space_width)
        )
    }
}

/// A word's extent and font, carried alongside span text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub text: String,
    pub start: Point,
    pub end: Point,
    pub font: WordFont,
}

/// A span of words rendered as one absolutely positioned paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub height: f32,
    pub font_size: f32,
    pub font_family: String,
    pub font_style: String,
    pub font_weight: String,
    pub top: f32,
    pub indent: f32,
    pub words: Vec<WordBox>,
}

impl TextFragment {
    /// The `style` attribute of the `p` element.
    pub fn style(&self) -> String {
        let starts: Vec<String> = self
            .words
            .iter()
            .map(|w| format!("({},{})", format_float(w.start.x), format_float(w.start.y)))
            .collect();
        let ends: Vec<String> = self
            .words
            .iter()
            .map(|w| format!("({},{})", format_float(w.end.x), format_float(w.end.y)))
            .collect();
        let fonts: Vec<String> = self.words.iter().map(|w| w.font.to_string()).collect();

        format!(
            "height:{}px;font-size:{}px;font-family:{};font-style:{};font-weight:{};top:{}px;position:absolute;text-indent:{}px;word-start-positions:[{}];word-end-positions:[{}];word-fonts:[{}]",
            format_float(self.height),
            format_float(self.font_size),
            self.font_family,
            self.font_style,
            self.font_weight,
            format_float(self.top),
            format_float(self.indent),
            starts.join(", "),
            ends.join(", "),
            fonts.join(", "),
        )
    }

    pub fn word_texts(&self) -> Vec<&str> {
        self.words.iter().map(|w| w.text.as_str()).collect()
    }
}

/// An 8-bit RGB color as written into style attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Paint style shared by lines and rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// `None` renders as `fill:none`
    pub fill: Option<Rgb>,
    pub stroke_width: f32,
    pub stroke: Rgb,
}

impl fmt::Display for StrokeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fill {
            Some(fill) => write!(f, "fill:{};", fill)?,
            None => write!(f, "fill:none;")?,
        }
        write!(
            f,
            "stroke-width:{};stroke:{}",
            format_float(self.stroke_width),
            self.stroke
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFragment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub style: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectFragment {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: StrokeStyle,
}

/// Reference to an extracted image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFragment {
    /// Sequence number within the document
    pub number: u32,
    pub suffix: String,
}

impl ImageFragment {
    pub fn new(number: u32, suffix: impl Into<String>) -> Self {
        Self {
            number,
            suffix: suffix.into(),
        }
    }

    /// `image<N>.<suffix>`
    pub fn file_name(&self) -> String {
        format!("image{}.{}", self.number, self.suffix)
    }

    pub fn src(&self) -> String {
        format!("embedded:{}", self.file_name())
    }
}

/// One element of page output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Fragment {
    Paragraph(TextFragment),
    Line(LineFragment),
    Rect(RectFragment),
    Image(ImageFragment),
}

impl Fragment {
    /// Element name in XHTML output.
    pub fn tag(&self) -> &'static str {
        match self {
            Fragment::Paragraph(_) => "p",
            Fragment::Line(_) => "line",
            Fragment::Rect(_) => "rect",
            Fragment::Image(_) => "img",
        }
    }

    /// Attributes in output order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Fragment::Paragraph(p) => vec![("style", p.style())],
            Fragment::Line(l) => vec![
                ("x1", format_float(l.x1)),
                ("y1", format_float(l.y1)),
                ("x2", format_float(l.x2)),
                ("y2", format_float(l.y2)),
                ("style", l.style.to_string()),
            ],
            Fragment::Rect(r) => vec![
                ("x", format_float(r.x)),
                ("y", format_float(r.y)),
                ("width", format_float(r.width)),
                ("height", format_float(r.height)),
                ("style", r.style.to_string()),
            ],
            Fragment::Image(i) => vec![("src", i.src()), ("alt", i.file_name())],
        }
    }

    /// Character content of the element, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Fragment::Paragraph(p) => Some(&p.text),
            _ => None,
        }
    }

    /// Characters counted against the document write limit.
    pub fn char_count(&self) -> usize {
        self.body().map(|b| b.chars().count()).unwrap_or(0)
    }

    pub fn as_text(&self) -> Option<&TextFragment> {
        match self {
            Fragment::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Fragment::Paragraph(_))
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Fragment::Line(_))
    }

    pub fn is_rect(&self) -> bool {
        matches!(self, Fragment::Rect(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Fragment::Image(_))
    }
}
