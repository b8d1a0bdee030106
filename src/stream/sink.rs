use std::io::{self, Write};

use crate::error::SinkError;

/// Destination for stream chunks. A chunk is either accepted whole or
/// rejected; `SinkError::Busy` asks the caller to offer it again later.
pub trait ChunkSink {
    fn send(&mut self, chunk: &[u8]) -> Result<(), SinkError>;

    /// First chunk of every session
    fn send_header(&mut self, header: &[u8]) -> Result<(), SinkError> {
        self.send(header)
    }
}

impl<F> ChunkSink for F
where
    F: FnMut(&[u8]) -> Result<(), SinkError>,
{
    fn send(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        self(chunk)
    }
}

/// Sink writing chunks to any `io::Write` (files, sockets, `Vec<u8>`)
#[derive(Debug)]
pub struct WriteSink<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ChunkSink for WriteSink<W> {
    fn send(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        match self.inner.write_all(chunk) {
            Ok(()) => {
                self.written += chunk.len();
                Ok(())
            },
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(SinkError::Busy),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Err(SinkError::Closed),
            Err(e) => Err(e.into()),
        }
    }
}
