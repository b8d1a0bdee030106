use super::{BlendEffect, Capabilities};
use crate::color::{join_rgb565, split_rgb565};

/// Bitwise complement of the drawn color
#[derive(Debug, Clone, Copy, Default)]
pub struct Inverse;

impl BlendEffect for Inverse {
    #[inline]
    fn blend(&self, _x: i32, _y: i32, fg: u16, _bg: u16) -> u16 {
        !fg
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NO_BACKGROUND
    }
}

/// Additive blend: fg + bg per channel, saturating at the channel maximum
#[derive(Debug, Clone, Copy, Default)]
pub struct Additive;

impl BlendEffect for Additive {
    #[inline]
    fn blend(&self, _x: i32, _y: i32, fg: u16, bg: u16) -> u16 {
        additive(fg, bg)
    }
}

/// Subtractive blend: removes fg from bg per channel, clamped at black
#[derive(Debug, Clone, Copy, Default)]
pub struct Subtract;

impl BlendEffect for Subtract {
    #[inline]
    fn blend(&self, _x: i32, _y: i32, fg: u16, bg: u16) -> u16 {
        subtract(fg, bg)
    }
}

/// Per-channel saturating sum. Fields are added separately so an overflowing
/// blue never carries into green.
#[inline]
pub fn additive(fg: u16, bg: u16) -> u16 {
    let (fr, fg_, fb) = split_rgb565(fg);
    let (br, bg_, bb) = split_rgb565(bg);
    join_rgb565((fr + br).min(0x1F), (fg_ + bg_).min(0x3F), (fb + bb).min(0x1F))
}

/// Per-channel `bg - fg`, floored at zero
#[inline]
pub fn subtract(fg: u16, bg: u16) -> u16 {
    let (fr, fg_, fb) = split_rgb565(fg);
    let (br, bg_, bb) = split_rgb565(bg);
    join_rgb565(br.saturating_sub(fr), bg_.saturating_sub(fg_), bb.saturating_sub(fb))
}
