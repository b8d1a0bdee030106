use std::sync::Arc;

use super::{alpha_blend, BlendEffect};
use crate::texture::Texture;

/// Per-pixel opacity taken from a texture placed at an offset on screen.
/// Pixels outside the texture keep the display color.
#[derive(Debug, Clone)]
pub struct ImageMask {
    texture: Arc<Texture>,
    offset_x: i32,
    offset_y: i32,
}

impl ImageMask {
    pub fn new(texture: Arc<Texture>, offset_x: i32, offset_y: i32) -> Self {
        Self {
            texture,
            offset_x,
            offset_y,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }
}

impl BlendEffect for ImageMask {
    #[inline]
    fn blend(&self, x: i32, y: i32, fg: u16, bg: u16) -> u16 {
        match self.texture.coverage(x - self.offset_x, y - self.offset_y) {
            Some(coverage) => alpha_blend(fg, bg, coverage),
            None => bg,
        }
    }
}
