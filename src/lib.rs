//! Per-pixel blending for RGB565 displays
//!
//! Shapes are drawn through an ordered pipeline of blend effects (alpha,
//! additive, subtract, grayscale, image masks, closures), and the finished
//! framebuffer can be streamed out as a BMP in bounded chunks.
//!
//! ```ignore
//! use gfxblend::{effects, Color, Framebuffer, GfxBlend};
//! use gfxblend::effects::Alpha;
//!
//! let mut gfx = GfxBlend::new(Framebuffer::new());
//! gfx.fill(Color::BLUE);
//! gfx.with(effects![Alpha::new(128)], |canvas| {
//!     gfxblend::shapes::filled_circle(canvas, 86, 160, 40, Color::RED);
//! });
//! ```

pub mod color;
pub mod config;
pub mod display;
pub mod effects;
pub mod error;
pub mod gfx;
pub mod pipeline;
pub mod shapes;
pub mod stream;
pub mod texture;

pub use color::Color;
pub use config::Config;
pub use display::{Canvas, Framebuffer, Rotation, Surface};
pub use effects::BlendEffect;
pub use gfx::GfxBlend;
pub use pipeline::Pipeline;
pub use shapes::GradientDirection;
pub use stream::{ChunkSink, DisplayStream, Progress};
pub use texture::{Texture, TextureKind};
