//! RGBA pixel canvas with simple clipped drawing primitives.
//!
//! Backed by an `image::RgbaImage` so that text can be drawn straight onto
//! it with `imageproc`.

use image::{Rgba, RgbaImage};

use crate::colormap::Color;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// An RGBA8 drawing surface. All primitives clip to the canvas bounds.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            img: RgbaImage::from_pixel(width as u32, height as u32, rgba(background)),
        }
    }

    pub fn width(&self) -> usize {
        self.img.width() as usize
    }

    pub fn height(&self) -> usize {
        self.img.height() as usize
    }

    /// RGBA pixel data, 4 bytes per pixel, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.img.as_raw()
    }

    /// The backing image, for text rendering.
    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.img
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as u32 >= self.img.width() || y as u32 >= self.img.height() {
            return;
        }
        self.img.put_pixel(x as u32, y as u32, rgba(color));
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.img.width() || y as u32 >= self.img.height() {
            return None;
        }
        let p = self.img.get_pixel(x as u32, y as u32);
        Some(Color::new(p[0], p[1], p[2], p[3]))
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.img.width() as i32);
        let y1 = rect.bottom().min(self.img.height() as i32);
        let color = rgba(color);
        for y in y0..y1 {
            for x in x0..x1 {
                self.img.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Horizontal 1-px line spanning [x0, x1).
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        for x in x0..x1 {
            self.set_pixel(x, y, color);
        }
    }

    /// Vertical 1-px line spanning [y0, y1).
    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Color) {
        for y in y0..y1 {
            self.set_pixel(x, y, color);
        }
    }

    /// 1-px rectangle outline.
    pub fn outline_rect(&mut self, rect: Rect, color: Color) {
        self.hline(rect.x, rect.right(), rect.y, color);
        self.hline(rect.x, rect.right(), rect.bottom() - 1, color);
        self.vline(rect.x, rect.y, rect.bottom(), color);
        self.vline(rect.right() - 1, rect.y, rect.bottom(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_background() {
        let canvas = Canvas::new(4, 3, Color::WHITE);
        assert_eq!(canvas.pixels().len(), 4 * 3 * 4);
        assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(canvas.pixel(3, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn drawing_clips_to_bounds() {
        let mut canvas = Canvas::new(2, 2, Color::WHITE);
        canvas.fill_rect(Rect::new(-5, -5, 100, 100), Color::BLACK);
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
        canvas.set_pixel(10, 10, Color::BLACK); // no panic
    }

    #[test]
    fn outline_leaves_interior() {
        let mut canvas = Canvas::new(5, 5, Color::WHITE);
        canvas.outline_rect(Rect::new(0, 0, 5, 5), Color::BLACK);
        assert_eq!(canvas.pixel(0, 2), Some(Color::BLACK));
        assert_eq!(canvas.pixel(2, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(2, 2), Some(Color::WHITE));
    }
}
