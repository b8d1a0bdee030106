//! Blending canvas
//!
//! `GfxBlend` owns a surface and a pipeline. Drawing calls run directly on the
//! surface while the pipeline is empty and through a [`BlendProxy`] otherwise;
//! the choice is made once when the call starts.
//!
//! Two ways to configure the pipeline:
//! - scoped: `with(steps, |canvas| ...)` draws with `steps` and clears afterwards
//! - setter: `set(steps)` leaves the pipeline active for every following call
//!   until `clear()` or the next `with`

use std::any::type_name;

use tracing::{debug, error, info};

use crate::color::Color;
use crate::display::{BlendProxy, Canvas, Surface};
use crate::effects::BlendEffect;
use crate::pipeline::Pipeline;
use crate::shapes::{self, GradientDirection};

pub struct GfxBlend<S: Surface> {
    surface: S,
    pipeline: Pipeline,
}

impl<S: Surface> GfxBlend<S> {
    /// Wrap a surface. A zero-sized surface is logged and every draw on it is a no-op.
    pub fn new(surface: S) -> Self {
        if surface.width() == 0 || surface.height() == 0 {
            error!(
                surface = type_name::<S>(),
                "surface has no pixels, blended drawing disabled"
            );
        } else {
            debug!(
                surface = type_name::<S>(),
                width = surface.width(),
                height = surface.height(),
                "blend canvas ready"
            );
        }
        Self {
            surface,
            pipeline: Pipeline::new(),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.surface.width() > 0 && self.surface.height() > 0
    }

    pub fn dump_config(&self) {
        info!(
            surface = type_name::<S>(),
            width = self.surface.width(),
            height = self.surface.height(),
            native_width = self.surface.native_width(),
            native_height = self.surface.native_height(),
            rotation = self.surface.rotation().degrees(),
            steps = self.pipeline.len(),
            "gfx blend"
        );
    }

    // ========================================================================
    // Pipeline configuration
    // ========================================================================

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn background_read_enabled(&self) -> bool {
        self.pipeline.read_background()
    }

    pub fn background_as_source_enabled(&self) -> bool {
        self.pipeline.background_as_source()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.pipeline.clear();
        self
    }

    /// Setter mode: replace the pipeline and keep it for later draw calls
    pub fn set(&mut self, steps: Vec<Box<dyn BlendEffect>>) -> &mut Self {
        self.pipeline.clear();
        self.pipeline.extend(steps);
        debug!(
            steps = self.pipeline.len(),
            read_background = self.pipeline.read_background(),
            background_as_source = self.pipeline.background_as_source(),
            "pipeline set"
        );
        self
    }

    /// Append one step to the current pipeline
    pub fn add(&mut self, step: impl BlendEffect + 'static) -> &mut Self {
        self.pipeline.add_step(step);
        self
    }

    /// Scoped mode: draw once with `steps`, then clear the pipeline
    pub fn with<F>(&mut self, steps: Vec<Box<dyn BlendEffect>>, f: F) -> &mut Self
    where
        F: FnOnce(&mut dyn Canvas),
    {
        self.pipeline.clear();
        self.pipeline.extend(steps);
        self.draw(f);
        self.pipeline.clear();
        self
    }

    /// One drawing call with whatever pipeline is active
    pub fn draw<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut dyn Canvas),
    {
        if self.pipeline.is_empty() {
            f(&mut self.surface);
        } else {
            let mut proxy = BlendProxy::new(&mut self.surface, &self.pipeline);
            f(&mut proxy);
        }
        self
    }

    // ========================================================================
    // Shapes
    // ========================================================================

    pub fn fill(&mut self, color: Color) -> &mut Self {
        self.draw(|c| c.fill(color))
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) -> &mut Self {
        self.draw(|c| c.draw_pixel(x, y, color))
    }

    pub fn filled_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> &mut Self {
        self.draw(|c| c.filled_rectangle(x, y, w, h, color))
    }

    pub fn filled_round_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        r: i32,
        color: Color,
    ) -> &mut Self {
        self.draw(|c| shapes::filled_round_rectangle(c, x, y, w, h, r, color))
    }

    pub fn filled_rectangle_gradient(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        from: Color,
        to: Color,
        direction: GradientDirection,
    ) -> &mut Self {
        self.draw(|c| shapes::filled_rectangle_gradient(c, x, y, w, h, from, to, direction))
    }

    pub fn filled_round_rectangle_gradient(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        r: i32,
        from: Color,
        to: Color,
        direction: GradientDirection,
    ) -> &mut Self {
        self.draw(|c| {
            shapes::filled_round_rectangle_gradient(c, x, y, w, h, r, from, to, direction);
        })
    }

    pub fn filled_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) -> &mut Self {
        self.draw(|c| shapes::filled_circle(c, cx, cy, r, color))
    }

    pub fn filled_circle_gradient(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        from: Color,
        to: Color,
        direction: GradientDirection,
    ) -> &mut Self {
        self.draw(|c| shapes::filled_circle_gradient(c, cx, cy, r, from, to, direction))
    }

    pub fn filled_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: Color) -> &mut Self {
        self.draw(|c| shapes::filled_ellipse(c, cx, cy, rx, ry, color))
    }

    pub fn filled_ellipse_gradient(
        &mut self,
        cx: i32,
        cy: i32,
        rx: i32,
        ry: i32,
        from: Color,
        to: Color,
        direction: GradientDirection,
    ) -> &mut Self {
        self.draw(|c| shapes::filled_ellipse_gradient(c, cx, cy, rx, ry, from, to, direction))
    }

    pub fn filled_ring(&mut self, cx: i32, cy: i32, inner: i32, outer: i32, color: Color) -> &mut Self {
        self.draw(|c| shapes::filled_ring(c, cx, cy, inner, outer, color))
    }

    pub fn filled_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> &mut Self {
        self.draw(|c| shapes::filled_triangle(c, x0, y0, x1, y1, x2, y2, color))
    }

    pub fn filled_polygon(&mut self, vertices: &[(f32, f32)], color: Color) -> &mut Self {
        self.draw(|c| shapes::filled_polygon(c, vertices, color))
    }

    // ========================================================================
    // Surface access
    // ========================================================================

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }
}
