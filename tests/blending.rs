//! Blended drawing through the public canvas

use std::collections::HashMap;

use gfxblend::effects::{background_as_source, Additive, Grayscale, Inverse};
use gfxblend::{
    effects, Canvas, Color, Framebuffer, GfxBlend, GradientDirection, Rotation, Surface,
};

/// Surface recording how often each screen pixel is written
struct Recorder {
    inner: Framebuffer,
    writes: HashMap<(i32, i32), u32>,
    bulk_calls: u32,
}

impl Recorder {
    fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Framebuffer::with_size(width, height),
            writes: HashMap::new(),
            bulk_calls: 0,
        }
    }

    fn max_writes(&self) -> u32 {
        self.writes.values().copied().max().unwrap_or(0)
    }
}

impl Canvas for Recorder {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        *self.writes.entry((x, y)).or_insert(0) += 1;
        self.inner.draw_pixel(x, y, color);
    }

    fn horizontal_line(&mut self, x: i32, y: i32, width: i32, color: Color) {
        self.bulk_calls += 1;
        for i in 0..width {
            self.draw_pixel(x + i, y, color);
        }
    }

    fn fill(&mut self, color: Color) {
        self.inner.fill(color);
    }
}

impl Surface for Recorder {
    fn rotation(&self) -> Rotation {
        self.inner.rotation()
    }

    fn native_width(&self) -> u32 {
        self.inner.native_width()
    }

    fn native_height(&self) -> u32 {
        self.inner.native_height()
    }

    fn native_pixel(&self, nx: i32, ny: i32) -> Option<u16> {
        self.inner.native_pixel(nx, ny)
    }
}

#[test]
fn test_shapes_never_overdraw_under_a_pipeline() {
    let mut gfx = GfxBlend::new(Recorder::new(64, 64));
    gfx.set(effects![Additive]);

    type Draw = fn(&mut GfxBlend<Recorder>);
    let shapes: [(&str, Draw); 9] = [
        ("round rect", |g| {
            g.filled_round_rectangle(2, 3, 50, 40, 9, Color::WHITE);
        }),
        ("round rect gradient", |g| {
            g.filled_round_rectangle_gradient(
                1,
                1,
                60,
                30,
                12,
                Color::RED,
                Color::BLUE,
                GradientDirection::Vertical,
            );
        }),
        ("rect gradient", |g| {
            g.filled_rectangle_gradient(0, 0, 33, 17, Color::RED, Color::GREEN, GradientDirection::Horizontal);
        }),
        ("ellipse", |g| {
            g.filled_ellipse(32, 32, 20, 11, Color::WHITE);
        }),
        ("ellipse gradient", |g| {
            g.filled_ellipse_gradient(32, 32, 9, 25, Color::RED, Color::BLUE, GradientDirection::Horizontal);
        }),
        ("circle", |g| {
            g.filled_circle(30, 30, 17, Color::WHITE);
        }),
        ("ring", |g| {
            g.filled_ring(32, 32, 8, 20, Color::WHITE);
        }),
        ("triangle", |g| {
            g.filled_triangle(3, 60, 30, 2, 61, 45, Color::WHITE);
        }),
        ("polygon", |g| {
            g.filled_polygon(&[(5.0, 5.0), (58.0, 10.0), (30.0, 30.0), (55.0, 58.0), (8.0, 50.0)], Color::WHITE);
        }),
    ];

    for (name, draw) in shapes {
        gfx.surface_mut().writes.clear();
        draw(&mut gfx);
        assert!(!gfx.surface().writes.is_empty(), "{name} drew nothing");
        assert_eq!(gfx.surface().max_writes(), 1, "{name} wrote a pixel twice");
    }

    // Intercepted lines go pixel by pixel, never through the bulk primitive
    assert_eq!(gfx.surface().bulk_calls, 0);
}

#[test]
fn test_direct_mode_uses_bulk_lines() {
    let mut gfx = GfxBlend::new(Recorder::new(32, 32));
    gfx.filled_round_rectangle(0, 0, 32, 32, 6, Color::WHITE);
    assert!(gfx.surface().bulk_calls > 0);
}

#[test]
fn test_scoped_pipeline_is_cleared() {
    let mut gfx = GfxBlend::new(Framebuffer::with_size(8, 8));
    gfx.with(effects![Inverse], |c| c.draw_pixel(0, 0, Color::BLACK));
    assert!(gfx.pipeline().is_empty());
    assert!(gfx.background_read_enabled());

    // Drawn directly again
    gfx.draw_pixel(1, 0, Color::BLACK);
    assert_eq!(gfx.surface().pixel_at(0, 0), Some(0xFFFF));
    assert_eq!(gfx.surface().pixel_at(1, 0), Some(0x0000));
}

#[test]
fn test_setter_mode_persists_until_cleared() {
    let mut gfx = GfxBlend::new(Framebuffer::with_size(8, 8));
    gfx.fill(Color::new(0, 0, 8));
    gfx.set(effects![Additive]);
    gfx.draw_pixel(0, 0, Color::new(0, 0, 8));
    gfx.draw_pixel(0, 0, Color::new(0, 0, 8));
    assert_eq!(gfx.surface().pixel_at(0, 0), Some(0x0003));

    gfx.clear();
    gfx.draw_pixel(0, 0, Color::new(0, 0, 8));
    assert_eq!(gfx.surface().pixel_at(0, 0), Some(0x0001));
}

#[test]
fn test_grayscale_existing_content_on_rotated_screen() {
    for rotation in [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
        let mut gfx = GfxBlend::new(Framebuffer::with_rotation(12, 20, rotation));
        gfx.fill(Color::BLUE);
        gfx.filled_rectangle(0, 0, 4, 4, Color::RED);

        gfx.with(effects![background_as_source(Grayscale::default())], |c| {
            c.filled_rectangle(0, 0, 2, 2, Color::GREEN);
        });

        let gray = gfx.surface().pixel_at(1, 1).unwrap();
        let untouched = gfx.surface().pixel_at(3, 3).unwrap();
        let (r, g, b) = gfxblend::color::unpack_rgb565(gray);
        assert!(r.abs_diff(g) <= 8 && g.abs_diff(b) <= 8, "{rotation:?}: {gray:#06x}");
        // red turns into a mid gray, blue would be much darker
        assert!(r > 40, "{rotation:?}: read the wrong background");
        assert_eq!(untouched, Color::RED.to_rgb565(), "{rotation:?}");
    }
}
