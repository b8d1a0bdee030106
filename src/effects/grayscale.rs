use super::{BlendEffect, Capabilities};
use crate::color::{pack_rgb565, unpack_rgb565};

/// Desaturates the drawn color towards its luminance.
/// `intensity` 0 leaves the color alone, 255 gives full grayscale.
/// Wrap in `background_as_source` to desaturate what is already on screen.
#[derive(Debug, Clone, Copy)]
pub struct Grayscale {
    intensity: u8,
}

impl Grayscale {
    pub fn new(intensity: u8) -> Self {
        Self { intensity }
    }
}

impl Default for Grayscale {
    fn default() -> Self {
        Self::new(255)
    }
}

impl BlendEffect for Grayscale {
    #[inline]
    fn blend(&self, _x: i32, _y: i32, fg: u16, _bg: u16) -> u16 {
        grayscale(fg, self.intensity)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NO_BACKGROUND
    }
}

/// BT.709 luminance with integer weights summing to 256
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8) as u8
}

#[inline]
pub fn grayscale(color: u16, intensity: u8) -> u16 {
    let (r, g, b) = unpack_rgb565(color);
    let lum = luminance(r, g, b);

    match intensity {
        0 => color,
        255 => pack_rgb565(lum, lum, lum),
        _ => {
            let t = intensity as i32;
            let toward = |c: u8| -> u8 {
                let c = c as i32;
                (c + t * (lum as i32 - c) / 255) as u8
            };
            pack_rgb565(toward(r), toward(g), toward(b))
        },
    }
}
