//! Page-level markup.

use serde::{Deserialize, Serialize};

use super::{Fragment, TextFragment};

/// The markup produced for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMarkup {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,

    /// Fragments in emission order
    pub fragments: Vec<Fragment>,

    /// Recoverable failures hit on this page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PageMarkup {
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            rotation: 0,
            fragments: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    pub fn with_rotation(mut self, rotation: u16) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn text_fragments(&self) -> impl Iterator<Item = &TextFragment> {
        self.fragments.iter().filter_map(Fragment::as_text)
    }

    /// Span texts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.text_fragments()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_line()).count()
    }

    pub fn rect_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_rect()).count()
    }

    pub fn image_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_image()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFragment, LineFragment, Rgb, StrokeStyle};

    #[test]
    fn test_page_counts() {
        let mut page = PageMarkup::letter(1);
        assert!(page.is_empty());
        page.push(Fragment::Line(LineFragment {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 0.0,
            style: StrokeStyle {
                fill: None,
                stroke_width: 1.0,
                stroke: Rgb::BLACK,
            },
        }));
        page.push(Fragment::Image(ImageFragment::new(0, "png")));

        assert_eq!(page.line_count(), 1);
        assert_eq!(page.rect_count(), 0);
        assert_eq!(page.image_count(), 1);
        assert_eq!(page.plain_text(), "");
        assert!(!page.is_landscape());
    }
}
