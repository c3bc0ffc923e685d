//! Benchmarks for glyph-run segmentation and page layout.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pdflayout::engine::replay::{GraphicsOp, RecordedDocument, RecordedPage};
use pdflayout::layout::Segmenter;
use pdflayout::model::{FontInfo, GlyphPosition, PageBox};
use pdflayout::{process_document, PageInfo, ParseOptions};

const LINE: &str = "Invoice 2024-117   Widget assembly, blue   12 x 4.50   54.00";

/// One text-show operation of `repeat` copies of [`LINE`]. Spaces are
/// widened so every word opens a new span, the worst case for splitting.
fn glyph_run(repeat: usize, y: f32) -> (String, Vec<GlyphPosition>) {
    let font = FontInfo::new("ABCDEF+Helvetica-Bold");
    let text = LINE.repeat(repeat);
    let mut x = 36.0;
    let glyphs = text
        .chars()
        .map(|c| {
            let glyph = GlyphPosition::new(c.to_string(), x, y, 5.5, font.clone(), 10.0);
            x += if c == ' ' { 9.0 } else { 5.5 };
            glyph
        })
        .collect();
    (text, glyphs)
}

fn bench_segment(c: &mut Criterion) {
    let segmenter = Segmenter::new();
    let mut group = c.benchmark_group("segment");

    for repeat in [1, 8, 64] {
        let (text, glyphs) = glyph_run(repeat, 700.0);
        group.bench_with_input(BenchmarkId::from_parameter(glyphs.len()), &glyphs, |b, glyphs| {
            b.iter(|| segmenter.segment(black_box(&text), black_box(glyphs)).unwrap());
        });
    }

    group.finish();
}

fn table_page(number: u32, rows: usize) -> RecordedPage {
    let mut page = RecordedPage::new(PageInfo::new(number, PageBox::letter()));
    let mut ops = Vec::new();
    for row in 0..rows {
        let y = 740.0 - row as f32 * 14.0;
        let (_, glyphs) = glyph_run(1, y);
        page = page.with_run(glyphs);
        ops.push(GraphicsOp::Rect {
            x: 30.0,
            y: y - 3.0,
            width: 550.0,
            height: 14.0,
        });
    }
    ops.push(GraphicsOp::Stroke);
    page.with_graphics(ops)
}

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    for pages in [1, 10] {
        let trace = RecordedDocument::new((1..=pages).map(|n| table_page(n, 50)).collect());
        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| {
                let mut doc = trace.clone();
                process_document(black_box(&mut doc), ParseOptions::default()).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segment, bench_document);
criterion_main!(benches);
