//! Vertical colorbar with decade tick labels.

use crate::canvas::{Canvas, Rect};
use crate::colormap::{Color, Colormap, LogScale};
use crate::error::{RenderError, RenderResult};
use crate::text::TextRenderer;

/// Draw a vertical colorbar into `bar`, high values at the top.
///
/// Tick labels are placed at every decade of the scale, right of the bar,
/// and the unit caption is drawn rotated alongside the labels.
pub fn draw_colorbar(
    canvas: &mut Canvas,
    bar: Rect,
    scale: &LogScale,
    colormap: &Colormap,
    unit_label: &str,
    text: &TextRenderer,
    font_size: f32,
) -> RenderResult<()> {
    if bar.w == 0 || bar.h == 0 {
        return Err(RenderError::InvalidGeometry(
            "degenerate colorbar rectangle".to_string(),
        ));
    }

    for py in 0..bar.h {
        let t = 1.0 - (py as f64 + 0.5) / bar.h as f64;
        let color = colormap.sample(t);
        canvas.hline(bar.x, bar.right(), bar.y + py as i32, color);
    }
    canvas.outline_rect(bar, Color::BLACK);

    let log_min = scale.vmin.log10();
    let log_max = scale.vmax.log10();
    let first_decade = log_min.ceil() as i32;
    let last_decade = log_max.floor() as i32;
    let label_x = bar.right() + 8;
    let mut label_right = label_x;

    for exp in first_decade..=last_decade {
        let t = (exp as f64 - log_min) / (log_max - log_min);
        let y = bar.bottom() - 1 - (t * (bar.h as f64 - 1.0)).round() as i32;
        canvas.hline(bar.right(), bar.right() + 5, y, Color::BLACK);
        let label = format!("1e{exp}");
        let (label_w, label_h) = text.size_of(&label, font_size);
        text.draw(canvas, label_x, y - label_h as i32 / 2, &label, font_size, Color::BLACK);
        label_right = label_right.max(label_x + label_w as i32);
    }

    let (caption_w, _) = text.size_of(unit_label, font_size);
    let caption_y = bar.y + (bar.h as i32 - caption_w as i32) / 2;
    text.draw_up(canvas, label_right + 12, caption_y, unit_label, font_size, Color::BLACK);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::by_name;

    #[test]
    fn bar_runs_high_to_low() {
        let mut canvas = Canvas::new(240, 120, Color::WHITE);
        let bar = Rect::new(10, 10, 20, 100);
        let scale = LogScale::new(1e-7, 1e-4).unwrap();
        let gray = by_name("gray").unwrap();
        let text = TextRenderer::new().unwrap();
        draw_colorbar(&mut canvas, bar, &scale, gray, "m-1 sr-1", &text, 14.0).unwrap();
        // Gray map: top of the bar near white, bottom near black.
        let top = canvas.pixel(20, 12).unwrap();
        let bottom = canvas.pixel(20, 107).unwrap();
        assert!(top.r > 200, "top sample {top:?}");
        assert!(bottom.r < 55, "bottom sample {bottom:?}");
    }

    #[test]
    fn decade_ticks_extend_past_bar() {
        let mut canvas = Canvas::new(240, 120, Color::WHITE);
        let bar = Rect::new(10, 10, 20, 100);
        let scale = LogScale::new(1e-7, 1e-4).unwrap();
        let jet = by_name("jet").unwrap();
        let text = TextRenderer::new().unwrap();
        draw_colorbar(&mut canvas, bar, &scale, jet, "m-1 sr-1", &text, 14.0).unwrap();
        // A tick mark at the very bottom decade (1e-7).
        assert_eq!(canvas.pixel(32, 109), Some(Color::BLACK));
        // And at the top decade (1e-4).
        assert_eq!(canvas.pixel(32, 10), Some(Color::BLACK));
    }

    #[test]
    fn decade_labels_leave_ink() {
        let mut canvas = Canvas::new(240, 120, Color::WHITE);
        let bar = Rect::new(10, 10, 20, 100);
        let scale = LogScale::new(1e-7, 1e-4).unwrap();
        let gray = by_name("gray").unwrap();
        let text = TextRenderer::new().unwrap();
        draw_colorbar(&mut canvas, bar, &scale, gray, "m-1 sr-1", &text, 14.0).unwrap();
        // "1e-4" label right of the bar near the top edge.
        let mut dark = 0;
        for y in 0..25 {
            for x in 38..90 {
                if canvas.pixel(x, y).is_some_and(|p| p.r < 128) {
                    dark += 1;
                }
            }
        }
        assert!(dark > 10, "expected label ink, found {dark} dark pixels");
    }

    #[test]
    fn rejects_empty_rect() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        let scale = LogScale::new(1e-7, 1e-4).unwrap();
        let jet = by_name("jet").unwrap();
        let text = TextRenderer::new().unwrap();
        let err = draw_colorbar(&mut canvas, Rect::new(0, 0, 0, 10), &scale, jet, "x", &text, 14.0);
        assert!(matches!(err, Err(RenderError::InvalidGeometry(_))));
    }
}
