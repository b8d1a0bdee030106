//! Demo scenes for the host binary
//!
//! Each scene redraws the whole screen every frame, so blends that read the
//! background always start from a known picture.

use std::sync::Arc;

use gfxblend::effects::{
    self as fx, background_as_source, from_fn, no_background, Additive, Alpha, Grayscale,
    ImageMask, Inverse, Subtract,
};
use gfxblend::{chain, effects, Canvas, Color, Framebuffer, GfxBlend, GradientDirection, Texture};

use crate::util::hsv_to_color;

pub type Gfx = GfxBlend<Framebuffer>;

/// A demo scene
pub trait Demo {
    /// Advance animation state by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Draw the whole frame
    fn render(&self, gfx: &mut Gfx);

    fn name(&self) -> &'static str;
}

/// All scenes in cycling order
pub fn all() -> Vec<Box<dyn Demo>> {
    vec![
        Box::new(GlassPanels::new()),
        Box::new(LightMixer::new()),
        Box::new(Stencil::new()),
        Box::new(Desaturate::new()),
        Box::new(Spotlight::new()),
        Box::new(Negative::new()),
    ]
}

fn screen(gfx: &Gfx) -> (i32, i32) {
    (gfx.surface().width() as i32, gfx.surface().height() as i32)
}

// ============================================================================
// Alpha panels over a gradient
// ============================================================================

pub struct GlassPanels {
    time: f32,
}

impl GlassPanels {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }
}

impl Demo for GlassPanels {
    fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    fn render(&self, gfx: &mut Gfx) {
        let (w, h) = screen(gfx);
        gfx.filled_rectangle_gradient(
            0,
            0,
            w,
            h,
            Color::new(10, 20, 80),
            Color::new(120, 20, 60),
            GradientDirection::Vertical,
        );

        let sway = (self.time * 1.5).sin() * w as f32 * 0.15;
        for i in 0..3 {
            let alpha = 80 + i as u8 * 60;
            let x = w / 8 + i * w / 10 + sway as i32;
            let y = h / 6 + i * h / 5;
            let color = hsv_to_color(self.time * 40.0 + i as f32 * 120.0, 0.8, 1.0);
            gfx.with(effects![Alpha::new(alpha)], |c| {
                gfxblend::shapes::filled_round_rectangle(c, x, y, w / 2, h / 4, 12, color);
            });
        }
    }

    fn name(&self) -> &'static str {
        "glass panels"
    }
}

// ============================================================================
// Additive light circles
// ============================================================================

pub struct LightMixer {
    time: f32,
}

impl LightMixer {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }
}

impl Demo for LightMixer {
    fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    fn render(&self, gfx: &mut Gfx) {
        let (w, h) = screen(gfx);
        gfx.fill(Color::BLACK);

        let (cx, cy) = (w / 2, h / 2);
        let r = w.min(h) / 4;
        let spread = r as f32 * (0.6 + 0.3 * (self.time * 0.8).sin());
        let lights = [Color::RED, Color::GREEN, Color::BLUE];

        gfx.set(effects![Additive]);
        for (i, color) in lights.into_iter().enumerate() {
            let angle = self.time * 0.5 + i as f32 * std::f32::consts::TAU / 3.0;
            let x = cx + (angle.cos() * spread) as i32;
            let y = cy + (angle.sin() * spread) as i32;
            gfx.filled_circle(x, y, r, color);
        }
        gfx.filled_ring(cx, cy, r * 2, r * 2 + 4, Color::new(40, 40, 40));
        gfx.clear();
    }

    fn name(&self) -> &'static str {
        "light mixer"
    }
}

// ============================================================================
// Subtractive cutouts on white
// ============================================================================

pub struct Stencil {
    time: f32,
}

impl Stencil {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }
}

impl Demo for Stencil {
    fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    fn render(&self, gfx: &mut Gfx) {
        let (w, h) = screen(gfx);
        gfx.fill(Color::WHITE);

        let spin = self.time * 0.7;
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 3.0);
        let radius = w.min(h) as f32 * 0.35;
        let star: Vec<(f32, f32)> = (0..10)
            .map(|i| {
                let a = spin + i as f32 * std::f32::consts::PI / 5.0;
                let r = if i % 2 == 0 { radius } else { radius * 0.45 };
                (cx + a.cos() * r, cy + a.sin() * r)
            })
            .collect();

        gfx.with(effects![Subtract], |c| {
            gfxblend::shapes::filled_polygon(c, &star, Color::new(0, 160, 200));
        });
        gfx.with(effects![Subtract], |c| {
            gfxblend::shapes::filled_triangle(
                c,
                w / 6,
                h - 20,
                w / 2,
                h / 2 + 20,
                w - w / 6,
                h - 20,
                Color::new(200, 0, 120),
            );
        });
    }

    fn name(&self) -> &'static str {
        "stencil"
    }
}

// ============================================================================
// Grayscale sweep over existing content
// ============================================================================

pub struct Desaturate {
    time: f32,
}

impl Desaturate {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }
}

impl Demo for Desaturate {
    fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    fn render(&self, gfx: &mut Gfx) {
        let (w, h) = screen(gfx);
        let bands = 6;
        for i in 0..bands {
            let y0 = i * h / bands;
            let y1 = (i + 1) * h / bands;
            let from = hsv_to_color(i as f32 * 60.0, 1.0, 1.0);
            let to = hsv_to_color(i as f32 * 60.0 + 60.0, 1.0, 0.6);
            gfx.filled_rectangle_gradient(0, y0, w, y1 - y0, from, to, GradientDirection::Horizontal);
        }

        // Grayscale the drawn area's own pixels; the drawn color is ignored
        let intensity = ((self.time.sin() * 0.5 + 0.5) * 255.0) as u8;
        gfx.with(effects![background_as_source(Grayscale::new(intensity))], |c| {
            gfxblend::shapes::filled_ellipse(c, w / 2, h / 2, w / 3, h / 4, Color::BLACK);
        });

        // Full grayscale, then dim it a little
        gfx.with(
            effects![background_as_source(chain![Grayscale::default(), Alpha::new(200)])],
            |c| gfxblend::shapes::filled_circle(c, w / 2, h / 8, w / 8, Color::BLACK),
        );
    }

    fn name(&self) -> &'static str {
        "desaturate"
    }
}

// ============================================================================
// Texture masks
// ============================================================================

pub struct Spotlight {
    time: f32,
    spot: Arc<Texture>,
    ramp: Arc<Texture>,
}

impl Spotlight {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            spot: Arc::new(Texture::spotlight(96)),
            ramp: Arc::new(Texture::horizontal_ramp(128, 40)),
        }
    }
}

impl Demo for Spotlight {
    fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    fn render(&self, gfx: &mut Gfx) {
        let (w, h) = screen(gfx);
        gfx.filled_rectangle_gradient(
            0,
            0,
            w,
            h,
            Color::new(0, 30, 10),
            Color::new(0, 10, 40),
            GradientDirection::Vertical,
        );

        let size = self.spot.width() as i32;
        let ox = ((self.time * 0.9).sin() * 0.5 + 0.5) * (w - size).max(0) as f32;
        let oy = ((self.time * 0.6).cos() * 0.5 + 0.5) * (h - size).max(0) as f32;
        let mask = ImageMask::new(Arc::clone(&self.spot), ox as i32, oy as i32);
        gfx.with(effects![mask], |c| {
            gfxblend::shapes::filled_round_rectangle_gradient(
                c,
                0,
                0,
                w,
                h,
                24,
                Color::new(255, 240, 180),
                Color::new(255, 120, 40),
                GradientDirection::Vertical,
            );
        });

        let (ramp_w, ramp_h) = (self.ramp.width() as i32, self.ramp.height() as i32);
        let ramp_y = h - ramp_h - 8;
        let ramp = ImageMask::new(Arc::clone(&self.ramp), 8, ramp_y);
        gfx.with(effects![ramp], |c| c.filled_rectangle(8, ramp_y, ramp_w, ramp_h, Color::WHITE));
    }

    fn name(&self) -> &'static str {
        "spotlight"
    }
}

// ============================================================================
// Closures and inversion
// ============================================================================

pub struct Negative {
    time: f32,
}

impl Negative {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }
}

impl Demo for Negative {
    fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    fn render(&self, gfx: &mut Gfx) {
        let (w, h) = screen(gfx);
        gfx.filled_ellipse_gradient(
            w / 2,
            h / 2,
            w / 2,
            h / 2,
            Color::new(255, 200, 0),
            Color::new(0, 80, 255),
            GradientDirection::Horizontal,
        );

        // Invert what is on screen inside a moving circle
        let y = ((self.time.sin() * 0.5 + 0.5) * h as f32) as i32;
        gfx.with(effects![background_as_source(Inverse)], |c| {
            gfxblend::shapes::filled_circle(c, w / 2, y, w / 4, Color::BLACK);
        });

        // Checkerboard through a position-aware closure, never reads the display
        let cell = 8;
        let checker = from_fn(move |x, y, fg, _bg| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                fg
            } else {
                fx::grayscale(fg, 255)
            }
        });
        gfx.with(effects![no_background(checker)], |c| {
            gfxblend::shapes::filled_circle_gradient(
                c,
                w / 2,
                h / 5,
                w / 5,
                Color::RED,
                Color::BLUE,
                GradientDirection::Vertical,
            );
        });
    }

    fn name(&self) -> &'static str {
        "negative"
    }
}
