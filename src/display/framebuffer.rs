use super::{Canvas, Rotation, Surface, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::color::Color;

// ============================================================================
// Framebuffer
// ============================================================================

/// RGB565 framebuffer in display memory layout: native orientation,
/// row-major, two bytes per pixel with the high byte first.
/// Drawing happens in screen coordinates and is rotated on write.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pixels: Vec<u8>,
    native_width: u32,
    native_height: u32,
    rotation: Rotation,
}

impl Framebuffer {
    /// Create a black framebuffer with default resolution (172x320)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a black framebuffer with custom native resolution
    pub fn with_size(native_width: u32, native_height: u32) -> Self {
        Self::with_rotation(native_width, native_height, Rotation::Deg0)
    }

    pub fn with_rotation(native_width: u32, native_height: u32, rotation: Rotation) -> Self {
        Self {
            pixels: vec![0; native_width as usize * native_height as usize * 2],
            native_width,
            native_height,
            rotation,
        }
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Raw bytes as the display controller sees them (snapshot source)
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Check if screen coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width() as i32 && y >= 0 && y < self.height() as i32
    }

    /// Byte offset of the pixel under screen coordinate (x, y)
    #[inline]
    fn pixel_index(&self, x: i32, y: i32) -> usize {
        let (nx, ny) = self
            .rotation
            .to_native(x, y, self.native_width, self.native_height);
        (ny as usize * self.native_width as usize + nx as usize) * 2
    }

    /// Byte step for one screen pixel right and one screen pixel down
    #[inline]
    fn screen_steps(&self) -> (isize, isize) {
        let stride = self.native_width as isize * 2;
        match self.rotation {
            Rotation::Deg0 => (2, stride),
            Rotation::Deg90 => (stride, -2),
            Rotation::Deg180 => (-2, -stride),
            Rotation::Deg270 => (-stride, 2),
        }
    }

    #[inline]
    fn write_raw(&mut self, idx: usize, raw: u16) {
        self.pixels[idx..idx + 2].copy_from_slice(&raw.to_be_bytes());
    }

    /// Raw pixel at screen coordinate (x, y)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u16> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x, y);
            Some(u16::from_be_bytes([self.pixels[idx], self.pixels[idx + 1]]))
        } else {
            None
        }
    }

    /// Write a raw RGB565 value at screen coordinate (x, y) (bounds checked)
    #[inline]
    pub fn set_pixel_raw(&mut self, x: i32, y: i32, raw: u16) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x, y);
            self.write_raw(idx, raw);
        }
    }

    /// Clip a run of `len` pixels starting at `start` to `0..limit`
    #[inline]
    fn clip_span(start: i32, len: i32, limit: u32) -> Option<(i32, usize)> {
        if len <= 0 {
            return None;
        }
        let first = start.max(0);
        let last = (start.saturating_add(len - 1)).min(limit as i32 - 1);
        if first > last {
            None
        } else {
            Some((first, (last - first + 1) as usize))
        }
    }

    /// Write `count` pixels starting at byte `idx`, stepping `step` bytes each
    fn run(&mut self, idx: usize, step: isize, count: usize, raw: u16) {
        let mut idx = idx as isize;
        for _ in 0..count {
            self.write_raw(idx as usize, raw);
            idx += step;
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for Framebuffer {
    #[inline]
    fn width(&self) -> u32 {
        self.rotation.screen_size(self.native_width, self.native_height).0
    }

    #[inline]
    fn height(&self) -> u32 {
        self.rotation.screen_size(self.native_width, self.native_height).1
    }

    #[inline]
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel_raw(x, y, color.to_rgb565());
    }

    /// Clipped once, then walks the buffer with a fixed byte step
    fn horizontal_line(&mut self, x: i32, y: i32, width: i32, color: Color) {
        if y < 0 || y >= self.height() as i32 {
            return;
        }
        if let Some((start, count)) = Self::clip_span(x, width, self.width()) {
            let idx = self.pixel_index(start, y);
            let (step, _) = self.screen_steps();
            self.run(idx, step, count, color.to_rgb565());
        }
    }

    fn vertical_line(&mut self, x: i32, y: i32, height: i32, color: Color) {
        if x < 0 || x >= self.width() as i32 {
            return;
        }
        if let Some((start, count)) = Self::clip_span(y, height, self.height()) {
            let idx = self.pixel_index(x, start);
            let (_, step) = self.screen_steps();
            self.run(idx, step, count, color.to_rgb565());
        }
    }

    fn fill(&mut self, color: Color) {
        let bytes = color.to_rgb565().to_be_bytes();
        for px in self.pixels.chunks_exact_mut(2) {
            px.copy_from_slice(&bytes);
        }
    }
}

impl Surface for Framebuffer {
    #[inline]
    fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[inline]
    fn native_width(&self) -> u32 {
        self.native_width
    }

    #[inline]
    fn native_height(&self) -> u32 {
        self.native_height
    }

    #[inline]
    fn native_pixel(&self, nx: i32, ny: i32) -> Option<u16> {
        if nx < 0 || ny < 0 || nx >= self.native_width as i32 || ny >= self.native_height as i32 {
            return None;
        }
        let idx = (ny as usize * self.native_width as usize + nx as usize) * 2;
        Some(u16::from_be_bytes([self.pixels[idx], self.pixels[idx + 1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROTATIONS: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    #[test]
    fn test_byte_layout_is_big_endian() {
        let mut fb = Framebuffer::with_size(2, 1);
        fb.set_pixel_raw(1, 0, 0xF81F);
        assert_eq!(fb.as_bytes(), &[0x00, 0x00, 0xF8, 0x1F]);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = Framebuffer::with_size(4, 4);
        fb.draw_pixel(-1, 0, Color::WHITE);
        fb.draw_pixel(4, 0, Color::WHITE);
        fb.draw_pixel(0, 4, Color::WHITE);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(fb.get_pixel(4, 0), None);
    }

    #[test]
    fn test_rotated_dimensions() {
        let fb = Framebuffer::with_rotation(172, 320, Rotation::Deg90);
        assert_eq!((fb.width(), fb.height()), (320, 172));
        assert_eq!((fb.native_width(), fb.native_height()), (172, 320));
    }

    #[test]
    fn test_rotated_write_lands_in_native_position() {
        // 90°: screen (0,0) is native top-right
        let mut fb = Framebuffer::with_rotation(4, 2, Rotation::Deg90);
        fb.set_pixel_raw(0, 0, 0xFFFF);
        assert_eq!(fb.native_pixel(3, 0), Some(0xFFFF));
        assert_eq!(fb.pixel_at(0, 0), Some(0xFFFF));
    }

    #[test]
    fn test_lines_match_pixels_in_every_rotation() {
        for rotation in ROTATIONS {
            let mut by_line = Framebuffer::with_rotation(5, 3, rotation);
            let mut by_pixel = Framebuffer::with_rotation(5, 3, rotation);

            by_line.horizontal_line(-2, 1, 10, Color::RED);
            by_line.vertical_line(1, -1, 3, Color::BLUE);
            for x in 0..by_pixel.width() as i32 {
                by_pixel.draw_pixel(x, 1, Color::RED);
            }
            for y in 0..2 {
                by_pixel.draw_pixel(1, y, Color::BLUE);
            }

            assert_eq!(by_line.as_bytes(), by_pixel.as_bytes(), "{:?}", rotation);
        }
    }

    #[test]
    fn test_empty_spans_draw_nothing() {
        let mut fb = Framebuffer::with_size(4, 4);
        fb.horizontal_line(0, 0, 0, Color::WHITE);
        fb.horizontal_line(0, 0, -3, Color::WHITE);
        fb.vertical_line(0, 5, 2, Color::WHITE);
        fb.horizontal_line(4, 0, 2, Color::WHITE);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill() {
        let mut fb = Framebuffer::with_size(3, 2);
        fb.fill(Color::WHITE);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_filled_rectangle_clips() {
        let mut fb = Framebuffer::with_size(4, 4);
        fb.filled_rectangle(2, 2, 10, 10, Color::WHITE);
        assert_eq!(fb.get_pixel(3, 3), Some(0xFFFF));
        assert_eq!(fb.get_pixel(1, 3), Some(0));
    }
}
