//! Integration tests for glyph-run segmentation.

use pdflayout::layout::Segmenter;
use pdflayout::model::{FontDescriptor, FontInfo, GlyphPosition, Matrix};
use pdflayout::Error;

fn glyphs(text: &str, start: f32, advance: f32, font: &FontInfo) -> Vec<GlyphPosition> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            GlyphPosition::new(c.to_string(), start + i as f32 * advance, 240.0, advance, font.clone(), 11.0)
        })
        .collect()
}

#[test]
fn test_table_row_becomes_positioned_spans() {
    let font = FontInfo::new("QWERTY+Helvetica");
    let mut row = glyphs("Qty", 72.0, 5.5, &font);
    row.extend(glyphs("Description", 144.0, 5.5, &font));
    row.extend(glyphs("12.50", 400.0, 5.5, &font));

    let spans = Segmenter::new().segment("QtyDescription12.50", &row).unwrap();
    let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Qty", "Description", "12.50"]);
    let indents: Vec<f32> = spans.iter().map(|s| s.indent).collect();
    assert_eq!(indents, vec![72.0, 144.0, 400.0]);
    assert!(spans.iter().all(|s| s.font_family == "Helvetica"));
}

#[test]
fn test_style_attribute_lists_words() {
    let font = FontInfo::new("Arial,BoldItalic");
    let run = glyphs("to be", 10.0, 5.0, &font);
    let spans = Segmenter::new().segment("to be", &run).unwrap();
    assert_eq!(spans.len(), 1);

    let style = spans[0].style();
    assert!(style.starts_with("height:"));
    assert!(style.contains("font-family:Arial;font-style:italic;font-weight:bold;top:240.0px;"));
    assert!(style.contains("position:absolute;text-indent:10.0px;"));
    assert!(style.contains("word-start-positions:[(10.0,240.0), (25.0,240.0)]"));
    assert!(style.contains("word-end-positions:[(20.0,240.0), (35.0,240.0)]"));
    assert!(style.contains("word-fonts:[(Arial,bold,italic,11.0,11.0,2.75), (Arial,bold,italic,11.0,11.0,2.75)]"));
}

#[test]
fn test_descriptor_overrides_name_inference() {
    let font = FontInfo::new("ABCDEF+Minion,Italic").with_descriptor(FontDescriptor {
        font_family: Some("Minion Pro".to_string()),
        font_weight: 700.0,
        italic_angle: 0.0,
    });
    let spans = Segmenter::new()
        .segment("x", &glyphs("x", 0.0, 5.0, &font))
        .unwrap();
    assert_eq!(spans[0].font_family, "Minion Pro");
    assert_eq!(spans[0].font_weight, "700.0");
}

#[test]
fn test_duplicate_and_edge_spaces_are_ignored() {
    let font = FontInfo::new("Courier");
    let run = glyphs(" a  b ", 0.0, 6.0, &font);
    let spans = Segmenter::new().segment(" a  b ", &run).unwrap();
    let words: Vec<&str> = spans.iter().flat_map(|s| s.word_texts()).collect();
    assert_eq!(words, vec!["a", "b"]);
    assert!(spans.iter().all(|s| !s.text.starts_with(' ') && !s.text.ends_with(' ')));
}

#[test]
fn test_vertical_text_is_kept_and_rotated_text_dropped() {
    let font = FontInfo::new("Courier");
    let mut run = glyphs("abc", 0.0, 6.0, &font);
    run[0].dir = 270.0;
    run[2].dir = 90.0;
    let spans = Segmenter::new().segment("abc", &run).unwrap();
    assert_eq!(spans[0].text, "ab");

    let mut sheared = glyphs("z", 0.0, 6.0, &font);
    sheared[0].text_matrix = Matrix::new(0.7, 0.7, -0.7, 0.7, 0.0, 0.0);
    assert!(Segmenter::new().segment("z", &sheared).unwrap().is_empty());
}

#[test]
fn test_segmentation_is_deterministic() {
    let font = FontInfo::new("Times-Roman");
    let mut run = glyphs("left  side", 20.0, 4.0, &font);
    run.extend(glyphs("right", 300.0, 4.0, &font));

    let segmenter = Segmenter::new();
    let first = segmenter.segment("left  sideright", &run).unwrap();
    for _ in 0..5 {
        assert_eq!(segmenter.segment("left  sideright", &run).unwrap(), first);
    }
}

#[test]
fn test_strict_mode_accepts_consistent_runs() {
    let font = FontInfo::new("Courier");
    let segmenter = Segmenter::new().with_strict_word_invariants(true);
    let result = segmenter.segment("ok go", &glyphs("ok go", 0.0, 6.0, &font));
    assert!(!matches!(result, Err(Error::StructuralInconsistency(_))));
    assert_eq!(result.unwrap()[0].words.len(), 2);
}
