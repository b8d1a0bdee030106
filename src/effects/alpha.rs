use super::BlendEffect;
use crate::color::{join_rgb565, split_rgb565};

/// Fixed-opacity blend of the drawn color over the display
#[derive(Debug, Clone, Copy)]
pub struct Alpha {
    alpha: u8,
}

impl Alpha {
    pub fn new(alpha: u8) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }
}

impl BlendEffect for Alpha {
    #[inline]
    fn blend(&self, _x: i32, _y: i32, fg: u16, bg: u16) -> u16 {
        alpha_blend(fg, bg, self.alpha)
    }
}

/// Weighted average of one raw channel field, divided by 255.
/// Uses (x + 1 + (x >> 8)) >> 8 instead of x / 255; exact for alpha 0 and 255.
#[inline]
fn blend_field(fg: u16, bg: u16, alpha: u32) -> u16 {
    let v = fg as u32 * alpha + bg as u32 * (255 - alpha);
    ((v + 1 + (v >> 8)) >> 8) as u16
}

/// Alpha blend two RGB565 colors channel by channel without leaving 5/6/5 space
#[inline]
pub fn alpha_blend(fg: u16, bg: u16, alpha: u8) -> u16 {
    match alpha {
        0 => bg,
        255 => fg,
        _ => {
            let a = alpha as u32;
            let (fr, fgg, fb) = split_rgb565(fg);
            let (br, bgg, bb) = split_rgb565(bg);
            join_rgb565(blend_field(fr, br, a), blend_field(fgg, bgg, a), blend_field(fb, bb, a))
        },
    }
}
