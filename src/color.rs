//! RGB565 color codec
//!
//! The display stores 16-bit packed pixels (5 bits red, 6 green, 5 blue).
//! Drawing APIs work with 8-bit channels, so every intercepted pixel crosses
//! this boundary twice.

use serde::{Deserialize, Serialize};

pub const RED_MASK: u16 = 0xF800;
pub const GREEN_MASK: u16 = 0x07E0;
pub const BLUE_MASK: u16 = 0x001F;

/// 8-bit per channel color as accepted by the drawing primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_rgb565(self) -> u16 {
        pack_rgb565(self.r, self.g, self.b)
    }

    #[inline]
    pub fn from_rgb565(raw: u16) -> Self {
        let (r, g, b) = unpack_rgb565(raw);
        Self { r, g, b }
    }

    /// Linear interpolation towards `other`, `t` in [0, 1]
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let mix = |a: u8, b: u8| -> u8 { (a as f32 + t * (b as f32 - a as f32)) as u8 };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// Pack 8-bit channels into RGB565 by truncation
#[inline]
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Unpack RGB565 into 8-bit channels using bit replication.
/// The high bits of each field are copied into the freed low bits, so a full
/// field maps to 255 and zero stays zero (0xFFFF is pure white).
#[inline]
pub fn unpack_rgb565(raw: u16) -> (u8, u8, u8) {
    let r5 = ((raw >> 11) & 0x1F) as u8;
    let g6 = ((raw >> 5) & 0x3F) as u8;
    let b5 = (raw & 0x1F) as u8;
    ((r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2))
}

/// Split RGB565 into raw (r5, g6, b5) fields
#[inline]
pub fn split_rgb565(raw: u16) -> (u16, u16, u16) {
    ((raw >> 11) & 0x1F, (raw >> 5) & 0x3F, raw & 0x1F)
}

/// Join raw (r5, g6, b5) fields; inputs must already fit their widths
#[inline]
pub fn join_rgb565(r: u16, g: u16, b: u16) -> u16 {
    (r << 11) | (g << 5) | b
}
