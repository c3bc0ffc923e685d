//! Paint style resolution for vector primitives.

use crate::model::{GraphicsState, Rgb, StrokeStyle};

/// Convert color components to RGB.
///
/// Only three-component colors are taken as RGB; any other channel count
/// yields `default`. Channels are clamped to `[0, 1]` before scaling.
pub fn to_rgb(components: &[f32], default: Rgb) -> Rgb {
    match components {
        [r, g, b] => Rgb::new(channel(*r), channel(*g), channel(*b)),
        _ => {
            log::debug!(
                "Color with {} components is not RGB, using {}",
                components.len(),
                default
            );
            default
        }
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Resolve the style of a primitive from the cached paint colors.
///
/// A cached fill color drives both fill and stroke. A cached stroke color
/// alone gives an unfilled outline. With neither, the current stroking
/// color is used for an unfilled outline.
pub fn resolve_style(
    fill: Option<&[f32]>,
    stroke: Option<&[f32]>,
    gs: &GraphicsState,
) -> StrokeStyle {
    let (fill, stroke) = match (fill, stroke) {
        (Some(fill), _) => (Some(to_rgb(fill, Rgb::WHITE)), to_rgb(fill, Rgb::BLACK)),
        (None, Some(stroke)) => (None, to_rgb(stroke, Rgb::BLACK)),
        (None, None) => (None, to_rgb(&gs.stroking_color.components, Rgb::BLACK)),
    };
    StrokeStyle {
        fill,
        stroke_width: gs.line_width,
        stroke,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn test_to_rgb() {
        assert_eq!(to_rgb(&[1.0, 0.0, 0.0], Rgb::BLACK), Rgb::new(255, 0, 0));
        assert_eq!(to_rgb(&[0.5, 0.5, 0.5], Rgb::BLACK), Rgb::new(128, 128, 128));
        assert_eq!(to_rgb(&[2.0, -1.0, 0.2], Rgb::BLACK), Rgb::new(255, 0, 51));
        assert_eq!(to_rgb(&[0.3], Rgb::WHITE), Rgb::WHITE);
        assert_eq!(to_rgb(&[0.0, 0.0, 0.0, 1.0], Rgb::BLACK), Rgb::BLACK);
    }

    #[test]
    fn test_fill_drives_stroke() {
        let gs = GraphicsState::default();
        let style = resolve_style(Some(&[1.0, 0.0, 0.0]), None, &gs);
        assert_eq!(
            style.to_string(),
            "fill:rgb(255,0,0);stroke-width:1.0;stroke:rgb(255,0,0)"
        );
    }

    #[test]
    fn test_non_rgb_fill_falls_back() {
        let gs = GraphicsState::default();
        let style = resolve_style(Some(&[0.5]), None, &gs);
        assert_eq!(style.fill, Some(Rgb::WHITE));
        assert_eq!(style.stroke, Rgb::BLACK);
    }

    #[test]
    fn test_stroke_only() {
        let gs = GraphicsState::default().with_line_width(2.5);
        let style = resolve_style(None, Some(&[0.0, 0.0, 1.0]), &gs);
        assert_eq!(
            style.to_string(),
            "fill:none;stroke-width:2.5;stroke:rgb(0,0,255)"
        );
    }

    #[test]
    fn test_nothing_cached() {
        let gs = GraphicsState::default();
        assert_eq!(
            resolve_style(None, None, &gs).to_string(),
            "fill:none;stroke-width:1.0;stroke:rgb(0,0,0)"
        );

        let gs = GraphicsState::default().with_stroking_color(Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(resolve_style(None, None, &gs).stroke, Rgb::new(0, 255, 0));
    }
}
