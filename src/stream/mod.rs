//! Framebuffer snapshots streamed as BMP
//!
//! A session starts with [`DisplayStream::start_streaming`]. The owner of the
//! framebuffer watches [`DisplayStream::needs_snapshot`] and calls
//! [`DisplayStream::take_snapshot`] once a frame is complete; the transport
//! side keeps calling [`DisplayStream::get_next_chunk`] until it reports
//! [`Progress::Done`]. The header goes out first, then the frozen pixel data
//! in chunks of at most `max_chunk_size` bytes.

pub mod bmp;
mod mqtt;
mod sink;

pub use bmp::{BmpHeader, HEADER_SIZE};
pub use mqtt::{MqttSink, DEFAULT_PORT as MQTT_DEFAULT_PORT, DEFAULT_TOPIC as MQTT_DEFAULT_TOPIC};
pub use sink::{ChunkSink, WriteSink};

use tracing::{debug, error, info};

use crate::display::Surface;
use crate::error::{SinkError, SnapshotError};

pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1000;

/// Result of one `get_next_chunk` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Header or pixel data was sent and more remains
    More,
    /// Nothing sent: the snapshot for this session has not been taken yet
    Waiting,
    /// All data sent, streaming is inactive
    Done,
}

impl Progress {
    /// Whether the caller should keep calling `get_next_chunk`
    pub fn is_pending(self) -> bool {
        self != Self::Done
    }
}

pub struct DisplayStream {
    width: u32,
    height: u32,
    /// None when the image is too large to describe as a BMP
    header: Option<BmpHeader>,
    buffer_len: usize,
    max_chunk_size: usize,
    snapshot: Vec<u8>,
    snapshot_ready: bool,
    position: usize,
    header_sent: bool,
    streaming: bool,
}

impl DisplayStream {
    /// Stream for a `width` x `height` RGB565 buffer in native layout
    pub fn new(width: u32, height: u32, max_chunk_size: usize) -> Self {
        let header = BmpHeader::new(width, height);
        if header.is_none() {
            error!(width, height, "image too large for a BMP header");
        }
        let buffer_len = header.map_or(0, |h| h.image_size() as usize);
        if buffer_len == 0 {
            error!(width, height, "stream has no pixel data");
        }
        Self {
            width,
            height,
            header,
            buffer_len,
            max_chunk_size: max_chunk_size.max(1),
            snapshot: Vec::new(),
            snapshot_ready: false,
            position: 0,
            header_sent: false,
            streaming: false,
        }
    }

    /// Stream matching a surface's native buffer
    pub fn for_surface<S: Surface + ?Sized>(surface: &S, max_chunk_size: usize) -> Self {
        Self::new(surface.native_width(), surface.native_height(), max_chunk_size)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data length in bytes
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    /// Total BMP size: header plus pixel data
    pub fn file_size(&self) -> usize {
        HEADER_SIZE + self.buffer_len
    }

    /// Pixel bytes sent so far in this session
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// A session is running and still needs its frame captured
    pub fn needs_snapshot(&self) -> bool {
        self.streaming && !self.snapshot_ready
    }

    /// Captured pixel data (little-endian RGB565), None before the first capture
    pub fn snapshot(&self) -> Option<&[u8]> {
        if self.snapshot.is_empty() {
            None
        } else {
            Some(&self.snapshot)
        }
    }

    pub fn header(&self) -> Option<BmpHeader> {
        self.header
    }

    /// Begin a new session. Any running session is abandoned.
    pub fn start_streaming(&mut self) {
        if self.streaming {
            debug!(position = self.position, "restarting stream session");
        }
        self.streaming = true;
        self.header_sent = false;
        self.position = 0;
        self.snapshot_ready = false;
        info!(bytes = self.file_size(), "stream session started");
    }

    /// Copy the framebuffer into the snapshot buffer and convert it to
    /// little-endian pixels. The buffer is allocated on first use and reused after.
    ///
    /// A running session keeps the frame it captured first; capturing again
    /// before the next `start_streaming` fails with `AlreadyTaken`.
    pub fn take_snapshot(&mut self, source: &[u8]) -> Result<(), SnapshotError> {
        if self.streaming && self.snapshot_ready {
            debug!(position = self.position, "snapshot already taken for this session");
            return Err(SnapshotError::AlreadyTaken);
        }
        if self.buffer_len == 0 || source.is_empty() {
            return Err(SnapshotError::NoSource);
        }
        if source.len() != self.buffer_len {
            return Err(SnapshotError::SizeMismatch {
                expected: self.buffer_len,
                actual: source.len(),
            });
        }

        if self.snapshot.len() == self.buffer_len {
            self.snapshot.copy_from_slice(source);
        } else {
            if let Err(e) = self.snapshot.try_reserve_exact(self.buffer_len) {
                error!(bytes = self.buffer_len, "snapshot allocation failed");
                return Err(e.into());
            }
            self.snapshot.extend_from_slice(source);
        }

        swap_bytes(&mut self.snapshot);
        self.snapshot_ready = true;
        debug!(bytes = self.buffer_len, "snapshot taken");
        Ok(())
    }

    /// Send the next piece of the session to `sink`.
    ///
    /// When the sink fails nothing advances, so the same piece is offered
    /// again on the next call.
    pub fn get_next_chunk<K: ChunkSink + ?Sized>(&mut self, sink: &mut K) -> Result<Progress, SinkError> {
        if !self.streaming {
            return Ok(Progress::Done);
        }

        if !self.header_sent {
            let Some(header) = self.header else {
                error!(width = self.width, height = self.height, "no BMP header, session dropped");
                self.finish();
                return Ok(Progress::Done);
            };
            sink.send_header(&header.to_bytes())?;
            self.header_sent = true;
            return Ok(Progress::More);
        }

        if self.position >= self.buffer_len {
            self.finish();
            return Ok(Progress::Done);
        }

        if !self.snapshot_ready {
            debug!("waiting for snapshot");
            return Ok(Progress::Waiting);
        }

        let end = self.buffer_len.min(self.position + self.max_chunk_size);
        if let Err(e) = sink.send(&self.snapshot[self.position..end]) {
            if e.is_transient() {
                debug!(position = self.position, "sink busy");
            }
            return Err(e);
        }
        self.position = end;

        if self.position < self.buffer_len {
            Ok(Progress::More)
        } else {
            self.finish();
            Ok(Progress::Done)
        }
    }

    fn finish(&mut self) {
        if self.streaming {
            self.streaming = false;
            info!(bytes = self.file_size(), "stream session finished");
        }
    }
}

/// Swap the two bytes of every 16-bit pixel, two pixels per step
fn swap_bytes(buf: &mut [u8]) {
    let mut words = buf.chunks_exact_mut(4);
    for word in &mut words {
        let v = u32::from_ne_bytes([word[0], word[1], word[2], word[3]]);
        let swapped = ((v << 8) & 0xFF00_FF00) | ((v >> 8) & 0x00FF_00FF);
        word.copy_from_slice(&swapped.to_ne_bytes());
    }
    let tail = words.into_remainder();
    if tail.len() >= 2 {
        tail.swap(0, 1);
    }
}
