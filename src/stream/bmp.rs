//! BMP header for top-down RGB565 images (BI_BITFIELDS)

use crate::color::{BLUE_MASK, GREEN_MASK, RED_MASK};

pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
pub const MASKS_SIZE: usize = 12;
/// File header + info header + channel masks; pixel data starts right after
pub const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE + MASKS_SIZE;

const BI_BITFIELDS: u32 = 3;
/// 72 dpi
const PIXELS_PER_METER: i32 = 2835;

/// Header fields that depend on the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    width: u32,
    height: u32,
    image_size: u32,
}

impl BmpHeader {
    /// Header for a `width` x `height` image. None when the image does not fit
    /// the format: sides are signed 32-bit and the file size is unsigned 32-bit.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return None;
        }
        let image_size = width.checked_mul(height)?.checked_mul(2)?;
        image_size.checked_add(HEADER_SIZE as u32)?;
        Some(Self {
            width,
            height,
            image_size,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn file_size(&self) -> u32 {
        HEADER_SIZE as u32 + self.image_size
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut w = Writer { buf: &mut out, pos: 0 };

        // file header
        w.put(b"BM");
        w.put(&self.file_size().to_le_bytes());
        w.put(&0u32.to_le_bytes()); // reserved
        w.put(&(HEADER_SIZE as u32).to_le_bytes());

        // info header, negative height = rows stored top to bottom
        w.put(&(INFO_HEADER_SIZE as u32).to_le_bytes());
        w.put(&(self.width as i32).to_le_bytes());
        w.put(&(-(self.height as i32)).to_le_bytes());
        w.put(&1u16.to_le_bytes()); // planes
        w.put(&16u16.to_le_bytes()); // bits per pixel
        w.put(&BI_BITFIELDS.to_le_bytes());
        w.put(&self.image_size().to_le_bytes());
        w.put(&PIXELS_PER_METER.to_le_bytes());
        w.put(&PIXELS_PER_METER.to_le_bytes());
        w.put(&0u32.to_le_bytes()); // colors used
        w.put(&0u32.to_le_bytes()); // colors important

        w.put(&(RED_MASK as u32).to_le_bytes());
        w.put(&(GREEN_MASK as u32).to_le_bytes());
        w.put(&(BLUE_MASK as u32).to_le_bytes());

        debug_assert_eq!(w.pos, HEADER_SIZE);
        out
    }
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}
