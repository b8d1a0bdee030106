//! Remote control via Unix socket
//!
//! Accepts one command per line, e.g. `echo snapshot | nc -U /tmp/gfxblend.sock`.

use std::io::{self, BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

pub const SOCKET_PATH: &str = "/tmp/gfxblend.sock";

/// Commands that can be sent over the socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a snapshot stream session
    Snapshot,
    Next,
    Prev,
    /// Jump to a demo by index
    Demo(usize),
    Quit,
}

/// Controller that listens for commands on a Unix socket
pub struct Controller {
    receiver: Receiver<Command>,
    path: PathBuf,
    _listener_thread: thread::JoinHandle<()>,
}

impl Controller {
    pub fn new() -> io::Result<Self> {
        Self::bind(SOCKET_PATH)
    }

    /// Listen on `path`, replacing a stale socket file
    pub fn bind(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let _ = std::fs::remove_file(&path);

        let listener = UnixListener::bind(&path)?;
        listener.set_nonblocking(true)?;

        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || Self::listener_loop(listener, sender));

        Ok(Self {
            receiver,
            path,
            _listener_thread: handle,
        })
    }

    fn listener_loop(listener: UnixListener, sender: Sender<Command>) {
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    let sender = sender.clone();
                    thread::spawn(move || Self::handle_client(stream, sender));
                },
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(50));
                },
                Err(e) => {
                    warn!(error = %e, "control socket closed");
                    break;
                },
            }
        }
    }

    fn handle_client(stream: UnixStream, sender: Sender<Command>) {
        // Accepted sockets inherit non-blocking mode on some platforms
        if stream.set_nonblocking(false).is_err() {
            return;
        }
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(Result::ok) {
            match parse_command(&line) {
                Some(cmd) => {
                    if sender.send(cmd).is_err() {
                        break;
                    }
                },
                None => debug!(line = line.trim(), "unknown control command"),
            }
        }
    }

    /// Pending commands, never blocks
    pub fn poll(&self) -> Vec<Command> {
        self.receiver.try_iter().collect()
    }

    pub fn socket_path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "s" | "snap" | "snapshot" => Some(Command::Snapshot),
        "n" | "next" | "right" => Some(Command::Next),
        "p" | "prev" | "left" => Some(Command::Prev),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => {
            if let Some(rest) = line.strip_prefix("demo ") {
                rest.trim().parse().ok().map(Command::Demo)
            } else {
                line.parse().ok().map(Command::Demo)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Instant;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("snapshot"), Some(Command::Snapshot));
        assert_eq!(parse_command("  NEXT \n"), Some(Command::Next));
        assert_eq!(parse_command("prev"), Some(Command::Prev));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("demo 3"), Some(Command::Demo(3)));
        assert_eq!(parse_command("2"), Some(Command::Demo(2)));
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn test_socket_round_trip() {
        let path = std::env::temp_dir().join(format!("gfxblend-test-{}.sock", std::process::id()));
        let controller = Controller::bind(&path).unwrap();

        let mut client = UnixStream::connect(&path).unwrap();
        client.write_all(b"snapshot\nnext\n").unwrap();
        drop(client);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = Vec::new();
        while received.len() < 2 && Instant::now() < deadline {
            received.extend(controller.poll());
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(received, vec![Command::Snapshot, Command::Next]);

        drop(controller);
        assert!(!path.exists());
    }
}
