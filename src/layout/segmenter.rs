//! Glyph-run segmentation into words and spans.
//!
//! A glyph run carries no word or line structure of its own. Words are
//! closed at space glyphs and at horizontal gaps wider than
//! [`GAP_THRESHOLD`]; the same gap test, applied at the start of a word,
//! splits the run into separately positioned spans.

use unicode_normalization::UnicodeNormalization;

use super::font::FontResolver;
use crate::error::{Error, Result};
use crate::model::{GlyphPosition, Point, TextFragment, WordBox, WordFont};
use crate::options::ParseOptions;

/// Gap, in layout units, above which two glyphs belong to different words.
pub const GAP_THRESHOLD: f32 = 1.0;

/// Groups a glyph run into positioned, font-styled spans.
#[derive(Debug, Clone)]
pub struct Segmenter {
    fonts: FontResolver,
    normalize_ligatures: bool,
    strict_word_invariants: bool,
}

/// A word being accumulated.
struct OpenWord<'a> {
    text: String,
    first: &'a GlyphPosition,
    last: &'a GlyphPosition,
}

/// Split point: index of the span's first word, and the span indent.
struct Split {
    word: usize,
    indent: f32,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            fonts: FontResolver::new(),
            normalize_ligatures: true,
            strict_word_invariants: false,
        }
    }

    pub fn from_options(options: &ParseOptions) -> Self {
        Self {
            fonts: FontResolver::new(),
            normalize_ligatures: options.normalize_ligatures,
            strict_word_invariants: options.strict_word_invariants,
        }
    }

    pub fn with_ligature_normalization(mut self, normalize: bool) -> Self {
        self.normalize_ligatures = normalize;
        self
    }

    pub fn with_strict_word_invariants(mut self, strict: bool) -> Self {
        self.strict_word_invariants = strict;
        self
    }

    /// Drop duplicate and edge spaces and glyphs with unsupported orientation.
    pub fn filter_glyphs<'a>(&self, glyphs: &'a [GlyphPosition]) -> Vec<&'a GlyphPosition> {
        let last_index = glyphs.len().saturating_sub(1);
        let mut retained: Vec<&GlyphPosition> = Vec::with_capacity(glyphs.len());

        for (i, glyph) in glyphs.iter().enumerate() {
            if glyph.is_space() {
                let after_space = retained.last().is_some_and(|g| g.is_space());
                if i == 0 || i == last_index || after_space {
                    continue;
                }
            }
            if glyph.dir != 0.0 && glyph.dir != 270.0 {
                log::trace!("Dropping glyph {:?} with direction {}", glyph.unicode, glyph.dir);
                continue;
            }
            if glyph.text_matrix.is_shear_rotation() {
                log::trace!("Dropping glyph {:?} with shear rotation", glyph.unicode);
                continue;
            }
            retained.push(glyph);
        }
        retained
    }

    /// Segment one text-show operation into spans.
    pub fn segment(&self, text: &str, glyphs: &[GlyphPosition]) -> Result<Vec<TextFragment>> {
        let glyphs = self.filter_glyphs(glyphs);
        if glyphs.is_empty() {
            log::trace!("No glyphs left to lay out for {:?}", text);
            return Ok(Vec::new());
        }

        let mut words: Vec<(String, &GlyphPosition)> = Vec::new();
        let mut starts: Vec<Point> = Vec::new();
        let mut ends: Vec<Point> = Vec::new();
        let mut splits: Vec<Split> = Vec::new();

        let mut open: Option<OpenWord> = None;
        let mut prev: Option<&GlyphPosition> = None;

        for &glyph in &glyphs {
            if glyph.is_space() {
                if let Some(word) = open.take() {
                    ends.push(Point::new(word.last.end_x, word.last.end_y));
                    words.push((word.text, word.first));
                }
                prev = Some(glyph);
                continue;
            }

            let wide_gap = prev.is_some_and(|p| glyph.x - p.end_x > GAP_THRESHOLD);
            if wide_gap {
                if let Some(word) = open.take() {
                    ends.push(Point::new(word.last.end_x, word.last.end_y));
                    words.push((word.text, word.first));
                }
            }

            match open.as_mut() {
                Some(word) => {
                    self.append_glyph(&mut word.text, glyph);
                    word.last = glyph;
                }
                None => {
                    if starts.is_empty() || wide_gap {
                        splits.push(Split {
                            word: starts.len(),
                            indent: glyph.x,
                        });
                    }
                    starts.push(Point::new(glyph.x, glyph.y));
                    let mut word_text = String::new();
                    self.append_glyph(&mut word_text, glyph);
                    open = Some(OpenWord {
                        text: word_text,
                        first: glyph,
                        last: glyph,
                    });
                }
            }
            prev = Some(glyph);
        }

        if let Some(word) = open.take() {
            ends.push(Point::new(word.last.end_x, word.last.end_y));
            words.push((word.text, word.first));
        }

        if starts.len() != ends.len() {
            let message = format!(
                "word starts ({}) and ends ({}) diverge in run {:?}",
                starts.len(),
                ends.len(),
                text
            );
            if self.strict_word_invariants {
                return Err(Error::StructuralInconsistency(message));
            }
            log::warn!("{}", message);
        }

        let words: Vec<(WordBox, &GlyphPosition)> = words
            .into_iter()
            .zip(starts.iter().zip(ends.iter()))
            .map(|((text, first), (&start, &end))| {
                let word = WordBox {
                    text,
                    start,
                    end,
                    font: self.word_font(first),
                };
                (word, first)
            })
            .collect();

        Ok(build_spans(words, &splits))
    }

    fn word_font(&self, glyph: &GlyphPosition) -> WordFont {
        let resolved = self.fonts.resolve(&glyph.font);
        WordFont {
            family: resolved.family,
            weight: resolved.weight,
            style: resolved.style,
            size: glyph.y_scale,
            size_pt: glyph.font_size_pt,
            space_width: glyph.space_width,
        }
    }

    fn append_glyph(&self, text: &mut String, glyph: &GlyphPosition) {
        if self.normalize_ligatures && glyph.unicode.chars().any(is_ligature) {
            text.extend(glyph.unicode.nfkc());
        } else {
            text.push_str(&glyph.unicode);
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut the word list at the split points, one span per segment.
fn build_spans(words: Vec<(WordBox, &GlyphPosition)>, splits: &[Split]) -> Vec<TextFragment> {
    let mut spans = Vec::with_capacity(splits.len());
    let mut words = words.into_iter();

    for (i, split) in splits.iter().enumerate() {
        let count = match splits.get(i + 1) {
            Some(next) => next.word - split.word,
            None => usize::MAX,
        };
        let mut span_words: Vec<WordBox> = Vec::new();
        let mut first_glyph = None;
        for (word, glyph) in words.by_ref().take(count) {
            first_glyph.get_or_insert(glyph);
            span_words.push(word);
        }
        let Some(first_glyph) = first_glyph else {
            continue;
        };

        let font = span_words[0].font.clone();
        let text = span_words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        spans.push(TextFragment {
            text,
            height: first_glyph.height,
            font_size: font.size,
            font_family: font.family,
            font_style: font.style,
            font_weight: font.weight,
            top: first_glyph.y,
            indent: split.indent,
            words: span_words,
        });
    }
    spans
}

/// Latin presentation-form ligatures (ff, fi, fl, ffi, ffl, long st, st).
fn is_ligature(c: char) -> bool {
    ('\u{FB00}'..='\u{FB06}').contains(&c)
}
