//! Mask textures
//!
//! Auxiliary bitmaps sampled by the image mask effect. Data is kept in the
//! display's native layouts: one byte per pixel for grayscale, two bytes per
//! pixel (high byte first) for RGB565.

/// Pixel layout of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// One coverage byte per pixel
    Grayscale,
    /// Big-endian RGB565, luminance is used as coverage
    Rgb565,
}

impl TextureKind {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Rgb565 => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    kind: TextureKind,
    data: Vec<u8>,
}

impl Texture {
    /// Create a new fully transparent (zeroed) texture
    pub fn new(width: u32, height: u32, kind: TextureKind) -> Self {
        Self {
            width,
            height,
            kind,
            data: vec![0; width as usize * height as usize * kind.bytes_per_pixel()],
        }
    }

    /// Wrap raw pixel data. Returns None if the length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, kind: TextureKind, data: Vec<u8>) -> Option<Self> {
        if data.len() == width as usize * height as usize * kind.bytes_per_pixel() {
            Some(Self {
                width,
                height,
                kind,
                data,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Set a grayscale coverage value. No-op for RGB565 textures or out of bounds.
    pub fn set_gray(&mut self, x: i32, y: i32, value: u8) {
        if self.kind == TextureKind::Grayscale && self.contains(x, y) {
            let idx = y as usize * self.width as usize + x as usize;
            self.data[idx] = value;
        }
    }

    /// Set an RGB565 pixel. No-op for grayscale textures or out of bounds.
    pub fn set_rgb565(&mut self, x: i32, y: i32, raw: u16) {
        if self.kind == TextureKind::Rgb565 && self.contains(x, y) {
            let idx = (y as usize * self.width as usize + x as usize) * 2;
            self.data[idx..idx + 2].copy_from_slice(&raw.to_be_bytes());
        }
    }

    /// Coverage (opacity) at texel (x, y), or None outside the texture.
    ///
    /// RGB565 texels use a shift-only expansion and a 2:5:1 luminance weighting.
    /// White therefore tops out at 250 rather than 255, which is invisible for masks.
    #[inline]
    pub fn coverage(&self, x: i32, y: i32) -> Option<u8> {
        if !self.contains(x, y) {
            return None;
        }
        let pixel = y as usize * self.width as usize + x as usize;
        match self.kind {
            TextureKind::Grayscale => Some(self.data[pixel]),
            TextureKind::Rgb565 => {
                let msb = self.data[pixel * 2] as u16; // RRRRRGGG
                let lsb = self.data[pixel * 2 + 1] as u16; // GGGBBBBB
                let r = msb & 0xF8;
                let g = ((msb & 0x07) << 5) | ((lsb & 0xE0) >> 3);
                let b = (lsb << 3) & 0xF8;
                Some(((r * 2 + g * 5 + b) >> 3) as u8)
            },
        }
    }

    /// Horizontal coverage ramp from transparent (left) to opaque (right)
    pub fn horizontal_ramp(width: u32, height: u32) -> Self {
        let mut tex = Self::new(width, height, TextureKind::Grayscale);
        let span = width.saturating_sub(1).max(1) as f32;
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tex.set_gray(x, y, (x as f32 / span * 255.0) as u8);
            }
        }
        tex
    }

    /// Opaque disc on a transparent background (soft spotlight mask)
    pub fn spotlight(size: u32) -> Self {
        let mut tex = Self::new(size, size, TextureKind::Grayscale);
        let c = (size as f32 - 1.0) / 2.0;
        let radius = size as f32 / 2.0;
        for y in 0..size as i32 {
            for x in 0..size as i32 {
                let dx = x as f32 - c;
                let dy = y as f32 - c;
                let d = (dx * dx + dy * dy).sqrt() / radius;
                tex.set_gray(x, y, ((1.0 - d).clamp(0.0, 1.0) * 255.0) as u8);
            }
        }
        tex
    }
}
