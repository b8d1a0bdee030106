use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a snapshot could not be captured
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no framebuffer to capture")]
    NoSource,
    #[error("framebuffer is {actual} bytes, stream expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    /// The running session already has its frame
    #[error("snapshot already taken for this session")]
    AlreadyTaken,
    #[error("cannot allocate snapshot buffer")]
    OutOfMemory(#[from] TryReserveError),
}

/// Failure reported by a chunk sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// Transport cannot take data right now; send the same chunk again later
    #[error("sink is busy")]
    Busy,
    #[error("sink is closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("mqtt client: {0}")]
    Client(#[from] rumqttc::ClientError),
    #[error("mqtt connection: {0}")]
    Connection(#[from] rumqttc::ConnectionError),
}

impl SinkError {
    /// Retrying later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Busy => true,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
