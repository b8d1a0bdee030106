//! Drawing surfaces
//!
//! `Canvas` is what shape code draws on. `Surface` is a canvas backed by a
//! native RGB565 buffer that can be read back, which the blend proxy needs
//! to sample the background.

mod framebuffer;
#[cfg(feature = "preview")]
mod preview;
pub mod proxy;

pub use framebuffer::Framebuffer;
#[cfg(feature = "preview")]
pub use preview::{InputEvent, PreviewTarget, PreviewWindow};
pub use proxy::BlendProxy;

use serde::{Deserialize, Serialize};

use crate::color::Color;

pub const DEFAULT_WIDTH: u32 = 172;
pub const DEFAULT_HEIGHT: u32 = 320;

// ============================================================================
// Rotation
// ============================================================================

/// Clockwise rotation of the screen relative to the native buffer layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// True when screen axes are swapped against the native buffer
    #[inline]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Screen size for a native buffer of `native_width` x `native_height`
    #[inline]
    pub fn screen_size(self, native_width: u32, native_height: u32) -> (u32, u32) {
        if self.swaps_axes() {
            (native_height, native_width)
        } else {
            (native_width, native_height)
        }
    }

    /// Map a screen coordinate to the native buffer coordinate holding it
    #[inline]
    pub fn to_native(self, x: i32, y: i32, native_width: u32, native_height: u32) -> (i32, i32) {
        let nw = native_width as i32;
        let nh = native_height as i32;
        match self {
            Self::Deg0 => (x, y),
            // swap, then mirror x
            Self::Deg90 => (nw - y - 1, x),
            Self::Deg180 => (nw - x - 1, nh - y - 1),
            // swap, then mirror y
            Self::Deg270 => (y, nh - x - 1),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got {}", degrees))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

// ============================================================================
// Canvas / Surface
// ============================================================================

/// Primitive drawing operations in screen coordinates.
/// Writes outside the canvas are clipped by the implementation.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

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

    fn fill(&mut self, color: Color);
}

/// A canvas whose native RGB565 buffer can be read back
pub trait Surface: Canvas {
    fn rotation(&self) -> Rotation;

    fn native_width(&self) -> u32;

    fn native_height(&self) -> u32;

    /// Raw pixel at a native buffer coordinate, None when out of bounds
    fn native_pixel(&self, nx: i32, ny: i32) -> Option<u16>;

    /// Raw pixel under a screen coordinate
    #[inline]
    fn pixel_at(&self, x: i32, y: i32) -> Option<u16> {
        let (nx, ny) = self
            .rotation()
            .to_native(x, y, self.native_width(), self.native_height());
        self.native_pixel(nx, ny)
    }
}
