//! Text rendering over an embedded TrueType font.
//!
//! All labels are set in DejaVu Sans Mono, compiled into the binary so the
//! renderer needs no font files at run time.

use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use crate::canvas::Canvas;
use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};

const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Glyph rasterizer for axis labels, ticks and captions.
pub struct TextRenderer {
    font: Font<'static>,
}

impl TextRenderer {
    pub fn new() -> RenderResult<Self> {
        let font = Font::try_from_bytes(FONT_DATA)
            .ok_or_else(|| RenderError::Font("embedded font failed to parse".to_string()))?;
        Ok(Self { font })
    }

    /// Width and height in pixels of `text` at `font_size`.
    pub fn size_of(&self, text: &str, font_size: f32) -> (u32, u32) {
        let (w, h) = text_size(Scale::uniform(font_size), &self.font, text);
        (w.max(0) as u32, h.max(0) as u32)
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut Canvas, x: i32, y: i32, text: &str, font_size: f32, color: Color) {
        draw_text_mut(
            canvas.image_mut(),
            Rgba([color.r, color.g, color.b, color.a]),
            x,
            y,
            Scale::uniform(font_size),
            &self.font,
            text,
        );
    }

    /// Draw `text` rotated 90 degrees counter-clockwise (reading bottom to
    /// top), with the top-left corner of the rotated block at `(x, y)`.
    pub fn draw_up(&self, canvas: &mut Canvas, x: i32, y: i32, text: &str, font_size: f32, color: Color) {
        let (w, h) = self.size_of(text, font_size);
        if w == 0 || h == 0 {
            return;
        }
        // Rasterize horizontally on a transparent strip, then rotate.
        let mut strip = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]));
        draw_text_mut(
            &mut strip,
            Rgba([color.r, color.g, color.b, color.a]),
            0,
            0,
            Scale::uniform(font_size),
            &self.font,
            text,
        );
        let rotated = imageops::rotate270(&strip);
        imageops::overlay(canvas.image_mut(), &rotated, x as i64, y as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_in(canvas: &Canvas, x0: i32, x1: i32, y0: i32, y1: i32) -> usize {
        let mut count = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(p) = canvas.pixel(x, y) {
                    if p.r < 128 {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    #[test]
    fn draws_dark_glyphs_on_white() {
        let text = TextRenderer::new().unwrap();
        let mut canvas = Canvas::new(300, 60, Color::WHITE);
        text.draw(&mut canvas, 10, 10, "12:00", 28.0, Color::BLACK);
        assert!(ink_in(&canvas, 10, 120, 10, 45) > 20);
        // Nothing outside the text box.
        assert_eq!(ink_in(&canvas, 150, 300, 0, 60), 0);
    }

    #[test]
    fn measured_size_tracks_text_length() {
        let text = TextRenderer::new().unwrap();
        let (short_w, h) = text.size_of("ab", 28.0);
        let (long_w, _) = text.size_of("abcd", 28.0);
        assert!(long_w > short_w);
        assert!(h > 0);
    }

    #[test]
    fn rotated_text_is_taller_than_wide() {
        let text = TextRenderer::new().unwrap();
        let mut canvas = Canvas::new(120, 400, Color::WHITE);
        text.draw_up(&mut canvas, 20, 20, "Altitude (km)", 28.0, Color::BLACK);
        let (w, h) = text.size_of("Altitude (km)", 28.0);
        // Ink spans roughly the text width vertically after rotation.
        assert!(ink_in(&canvas, 20, 20 + h as i32, 20, 20 + w as i32) > 50);
        // No ink to the right of the rotated strip.
        assert_eq!(ink_in(&canvas, 20 + h as i32 + 5, 120, 0, 400), 0);
    }
}
