//! Collection of distinct text angles on a page.

use std::collections::BTreeSet;

use crate::engine::PageTextCallbacks;
use crate::error::Result;
use crate::model::GlyphPosition;

/// Read-only text pass that records every glyph baseline angle.
#[derive(Debug, Default)]
pub struct AngleCollector {
    angles: BTreeSet<i32>,
}

impl AngleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct angles in ascending order.
    pub fn angles(&self) -> Vec<i32> {
        self.angles.iter().copied().collect()
    }

    pub fn into_angles(self) -> BTreeSet<i32> {
        self.angles
    }
}

impl PageTextCallbacks for AngleCollector {
    fn on_glyph_run(&mut self, _text: &str, glyphs: &[GlyphPosition]) -> Result<()> {
        self.angles.extend(glyphs.iter().map(GlyphPosition::angle));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontInfo, Matrix};

    #[test]
    fn test_angles_sorted_and_distinct() {
        let upright = GlyphPosition::new("a", 0.0, 0.0, 5.0, FontInfo::new("F"), 10.0);
        let mut rotated = upright.clone();
        rotated.text_matrix = Matrix::rotation(270f32.to_radians());
        let mut quarter = upright.clone();
        quarter.text_matrix = Matrix::rotation(90f32.to_radians());

        let mut collector = AngleCollector::new();
        collector
            .on_glyph_run("x", &[rotated, upright.clone(), quarter])
            .unwrap();
        collector.on_glyph_run("y", &[upright]).unwrap();
        assert_eq!(collector.angles(), vec![0, 90, 270]);
    }
}
