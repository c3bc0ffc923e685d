//! Integration tests for vector hints, driven by JSON traces.

use pdflayout::engine::replay::RecordedDocument;
use pdflayout::model::{Fragment, Rgb};
use pdflayout::render::{to_xhtml, XhtmlOptions};
use pdflayout::{process_document, ParseOptions};

fn run(graphics: &str) -> Vec<Fragment> {
    let json = format!(
        r#"{{"pages": [{{
            "number": 1,
            "media_box": {{"llx": 0, "lly": 0, "urx": 612, "ury": 792}},
            "graphics": {}
        }}]}}"#,
        graphics
    );
    let mut trace = RecordedDocument::from_json(&json).unwrap();
    let markup = process_document(&mut trace, ParseOptions::default()).unwrap();
    markup.pages[0].fragments.clone()
}

fn rects(fragments: &[Fragment]) -> Vec<&pdflayout::model::RectFragment> {
    fragments
        .iter()
        .filter_map(|f| match f {
            Fragment::Rect(r) => Some(r),
            _ => None,
        })
        .collect()
}

#[test]
fn test_open_triangle_gets_closing_edge() {
    let fragments = run(r#"[
        {"op": "move_to", "x": 10, "y": 10},
        {"op": "line_to", "x": 100, "y": 10},
        {"op": "line_to", "x": 100, "y": 100},
        {"op": "line_to", "x": 10, "y": 100},
        {"op": "end_path"}
    ]"#);

    assert_eq!(fragments.len(), 4);
    assert!(fragments.iter().all(Fragment::is_line));
    match &fragments[3] {
        Fragment::Line(closing) => {
            assert_eq!((closing.x1, closing.y1), (10.0, 692.0));
            assert_eq!((closing.x2, closing.y2), (10.0, 782.0));
        }
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn test_closed_path_gets_no_extra_edge() {
    let fragments = run(r#"[
        {"op": "move_to", "x": 10, "y": 10},
        {"op": "line_to", "x": 100, "y": 10},
        {"op": "line_to", "x": 100, "y": 100},
        {"op": "line_to", "x": 10, "y": 100},
        {"op": "close_path"},
        {"op": "end_path"}
    ]"#);
    assert_eq!(fragments.len(), 3);
}

#[test]
fn test_rectangle_geometry() {
    let fragments = run(r#"[
        {"op": "rect", "x": 50, "y": 100, "width": 200, "height": 30}
    ]"#);

    assert_eq!(fragments.iter().filter(|f| f.is_line()).count(), 0);
    let found = rects(&fragments);
    assert_eq!(found.len(), 1);
    assert_eq!((found[0].x, found[0].y), (50.0, 662.0));
    assert_eq!((found[0].width, found[0].height), (200.0, 30.0));
    assert_eq!(
        found[0].style.to_string(),
        "fill:none;stroke-width:1.0;stroke:rgb(0,0,0)"
    );
}

#[test]
fn test_zero_width_paths_are_silent() {
    let fragments = run(r#"[
        {"op": "set_line_width", "width": 0},
        {"op": "move_to", "x": 0, "y": 0},
        {"op": "line_to", "x": 50, "y": 0},
        {"op": "line_to", "x": 50, "y": 50},
        {"op": "line_to", "x": 0, "y": 50},
        {"op": "end_path"},
        {"op": "rect", "x": 0, "y": 0, "width": 10, "height": 10}
    ]"#);
    assert!(fragments.is_empty());
}

#[test]
fn test_hidden_edge_is_not_counted_toward_closing() {
    let fragments = run(r#"[
        {"op": "set_line_width", "width": 1},
        {"op": "move_to", "x": 0, "y": 0},
        {"op": "line_to", "x": 10, "y": 0},
        {"op": "line_to", "x": 10, "y": 10},
        {"op": "set_line_width", "width": 0},
        {"op": "line_to", "x": 0, "y": 10},
        {"op": "set_line_width", "width": 1},
        {"op": "end_path"}
    ]"#);

    assert_eq!(fragments.len(), 2);
    match &fragments[1] {
        Fragment::Line(line) => {
            assert_eq!((line.x1, line.y1), (10.0, 792.0));
            assert_eq!((line.x2, line.y2), (10.0, 782.0));
        }
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn test_fill_color_styles_following_primitives() {
    let fragments = run(r#"[
        {"op": "rect", "x": 0, "y": 0, "width": 10, "height": 10},
        {"op": "set_fill_color", "components": [1, 0, 0]},
        {"op": "fill"},
        {"op": "rect", "x": 20, "y": 0, "width": 10, "height": 10}
    ]"#);

    let found = rects(&fragments);
    assert_eq!(found[0].style.fill, None);
    assert_eq!(found[1].style.fill, Some(Rgb::new(255, 0, 0)));
    assert_eq!(found[1].style.stroke, Rgb::new(255, 0, 0));
}

#[test]
fn test_stroke_color_leaves_fill_none() {
    let fragments = run(r#"[
        {"op": "set_fill_color", "components": [0, 0, 1]},
        {"op": "stroke"},
        {"op": "rect", "x": 0, "y": 0, "width": 10, "height": 10}
    ]"#);

    let found = rects(&fragments);
    assert_eq!(
        found[0].style.to_string(),
        "fill:none;stroke-width:1.0;stroke:rgb(0,0,255)"
    );
}

#[test]
fn test_uncached_colors_use_stroking_color() {
    let fragments = run(r#"[
        {"op": "set_stroke_color", "components": [0, 1, 0]},
        {"op": "set_line_width", "width": 2.5},
        {"op": "move_to", "x": 0, "y": 0},
        {"op": "line_to", "x": 10, "y": 0}
    ]"#);

    match &fragments[0] {
        Fragment::Line(line) => {
            assert_eq!(line.style.fill, None);
            assert_eq!(line.style.stroke, Rgb::new(0, 255, 0));
            assert_eq!(line.style.stroke_width, 2.5);
        }
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn test_non_rgb_fill_falls_back_to_white_and_black() {
    let fragments = run(r#"[
        {"op": "set_fill_color", "components": [0.5]},
        {"op": "fill"},
        {"op": "rect", "x": 0, "y": 0, "width": 10, "height": 10}
    ]"#);

    let found = rects(&fragments);
    assert_eq!(found[0].style.fill, Some(Rgb::WHITE));
    assert_eq!(found[0].style.stroke, Rgb::BLACK);
}

#[test]
fn test_close_path_clears_cached_colors() {
    let fragments = run(r#"[
        {"op": "set_fill_color", "components": [1, 0, 0]},
        {"op": "fill"},
        {"op": "close_path"},
        {"op": "rect", "x": 0, "y": 0, "width": 10, "height": 10}
    ]"#);
    assert_eq!(rects(&fragments)[0].style.fill, None);
}

#[test]
fn test_curves_only_move_the_current_point() {
    let fragments = run(r#"[
        {"op": "move_to", "x": 0, "y": 0},
        {"op": "curve_to", "x1": 5, "y1": 5, "x2": 10, "y2": 5, "x3": 20, "y3": 0},
        {"op": "line_to", "x": 40, "y": 0}
    ]"#);

    assert_eq!(fragments.len(), 1);
    match &fragments[0] {
        Fragment::Line(line) => assert_eq!(line.x1, 20.0),
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn test_primitive_cap_adds_page_warning() {
    let json = r#"{"pages": [{
        "number": 1,
        "graphics": [
            {"op": "rect", "x": 0, "y": 0, "width": 10, "height": 10},
            {"op": "rect", "x": 20, "y": 0, "width": 10, "height": 10},
            {"op": "rect", "x": 40, "y": 0, "width": 10, "height": 10}
        ]
    }]}"#;
    let mut trace = RecordedDocument::from_json(json).unwrap();
    let options = ParseOptions::new().with_max_graphics_primitives(2);
    let markup = process_document(&mut trace, options).unwrap();

    assert_eq!(markup.pages[0].rect_count(), 2);
    assert_eq!(markup.warnings.len(), 1);
    assert!(markup.warnings[0].message.contains("1 vector primitives dropped"));
}

#[test]
fn test_hints_render_as_self_closing_elements() {
    let json = r#"{"pages": [{
        "number": 1,
        "graphics": [{"op": "rect", "x": 50, "y": 100, "width": 200, "height": 30}]
    }]}"#;
    let mut trace = RecordedDocument::from_json(json).unwrap();
    let markup = process_document(&mut trace, ParseOptions::default()).unwrap();

    let xhtml = to_xhtml(&markup, &XhtmlOptions::default()).unwrap();
    assert!(xhtml.contains(
        r#"<rect x="50.0" y="662.0" width="200.0" height="30.0" style="fill:none;stroke-width:1.0;stroke:rgb(0,0,0)"/>"#
    ));

    let bare = to_xhtml(&markup, &XhtmlOptions::default().with_vector_hints(false)).unwrap();
    assert!(!bare.contains("<rect"));
}
