//! Draw interception
//!
//! `BlendProxy` stands in for a surface during one drawing call and routes
//! every pixel through the pipeline before writing it. Lines are split into
//! single pixels since each one may blend with different background content.

use super::{Canvas, Surface};
use crate::color::Color;
use crate::pipeline::Pipeline;

pub struct BlendProxy<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    pipeline: &'a Pipeline,
}

impl<'a, S: Surface + ?Sized> BlendProxy<'a, S> {
    pub fn new(surface: &'a mut S, pipeline: &'a Pipeline) -> Self {
        Self { surface, pipeline }
    }

    /// Current display pixel under a screen coordinate, 0 off screen.
    /// The native buffer is read directly, so the rotation is undone here.
    #[inline]
    fn background(&self, x: i32, y: i32) -> u16 {
        self.surface.pixel_at(x, y).unwrap_or(0)
    }

    /// Blend one pixel without writing it
    #[inline]
    pub fn blended(&self, x: i32, y: i32, color: Color) -> Color {
        let mut fg = color.to_rgb565();
        let bg = if self.pipeline.read_background() {
            self.background(x, y)
        } else {
            0
        };
        if self.pipeline.background_as_source() {
            fg = bg;
        }
        Color::from_rgb565(self.pipeline.apply(x, y, fg, bg))
    }
}

impl<S: Surface + ?Sized> Canvas for BlendProxy<'_, S> {
    #[inline]
    fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline]
    fn height(&self) -> u32 {
        self.surface.height()
    }

    #[inline]
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        let out = self.blended(x, y, color);
        self.surface.draw_pixel(x, y, out);
    }

    fn horizontal_line(&mut self, x: i32, y: i32, width: i32, color: Color) {
        for i in 0..width {
            self.draw_pixel(x + i, y, color);
        }
    }

    fn vertical_line(&mut self, x: i32, y: i32, height: i32, color: Color) {
        for i in 0..height {
            self.draw_pixel(x, y + i, color);
        }
    }

    fn filled_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        for row in 0..height {
            self.horizontal_line(x, y + row, width, color);
        }
    }

    /// Whole-screen fills bypass the pipeline
    fn fill(&mut self, color: Color) {
        self.surface.fill(color);
    }
}
