//! Byte-stream transport to the player's IPC server.
//!
//! On Unix the endpoint is a socket path; on Windows it is a named pipe.

use std::io;
use std::sync::{Arc, Mutex};

/// A connected control channel. Frames are written whole and flushed.
pub trait CommandChannel: Send {
    /// Whether the channel still believes the other end is there.
    fn is_connected(&self) -> bool;
    /// Write one encoded frame and flush it.
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()>;
    /// Close the channel. Idempotent.
    fn close(&mut self);
}

/// A channel shared between the session and detached dispatch threads.
pub type SharedChannel = Arc<Mutex<Box<dyn CommandChannel>>>;

/// Open a channel to `endpoint`. Fails if nobody is listening yet.
pub fn connect(endpoint: &str) -> io::Result<Box<dyn CommandChannel>> {
    #[cfg(unix)]
    {
        Ok(Box::new(unix::SocketChannel::connect(std::path::Path::new(endpoint))?))
    }
    #[cfg(windows)]
    {
        Ok(Box::new(windows::PipeChannel::connect(endpoint)?))
    }
    #[cfg(not(any(unix, windows)))]
    {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no IPC transport for {endpoint} on this platform"),
        ))
    }
}

#[cfg(unix)]
mod unix {
    use std::io::{self, Read, Write};
    use std::net::Shutdown;
    use std::os::unix::net::UnixStream;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use tracing::{debug, trace, warn};

    use super::CommandChannel;

    pub struct SocketChannel {
        stream: Option<UnixStream>,
        open: Arc<AtomicBool>,
    }

    impl SocketChannel {
        pub fn connect(path: &Path) -> io::Result<Self> {
            let stream = UnixStream::connect(path)?;
            let open = Arc::new(AtomicBool::new(true));
            spawn_drain(stream.try_clone()?, open.clone());
            Ok(Self {
                stream: Some(stream),
                open,
            })
        }
    }

    /// Read and discard whatever the player writes back so it never blocks
    /// on a full socket. EOF marks the channel closed.
    fn spawn_drain(mut reader: UnixStream, open: Arc<AtomicBool>) {
        let spawned = thread::Builder::new()
            .name("player-ipc-drain".to_string())
            .spawn(move || {
                let mut buf = [0u8; 4096];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => trace!(bytes = n, "discarded player output"),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            debug!(error = %e, "player channel read failed");
                            break;
                        }
                    }
                }
                open.store(false, Ordering::Release);
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not start player output drain");
        }
    }

    impl CommandChannel for SocketChannel {
        fn is_connected(&self) -> bool {
            self.stream.is_some() && self.open.load(Ordering::Acquire)
        }

        fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
            let Some(stream) = self.stream.as_mut() else {
                return Err(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "player channel is closed",
                ));
            };
            let result = stream.write_all(frame).and_then(|()| stream.flush());
            if let Err(e) = &result {
                if matches!(
                    e.kind(),
                    io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset
                ) {
                    self.open.store(false, Ordering::Release);
                }
            }
            result
        }

        fn close(&mut self) {
            if let Some(stream) = self.stream.take() {
                let _ = stream.shutdown(Shutdown::Both);
            }
            self.open.store(false, Ordering::Release);
        }
    }
}

#[cfg(windows)]
mod windows {
    use std::fs::{File, OpenOptions};
    use std::io::{self, Write};

    use super::CommandChannel;

    pub struct PipeChannel {
        pipe: Option<File>,
    }

    impl PipeChannel {
        pub fn connect(endpoint: &str) -> io::Result<Self> {
            let pipe = OpenOptions::new().read(true).write(true).open(endpoint)?;
            Ok(Self { pipe: Some(pipe) })
        }
    }

    impl CommandChannel for PipeChannel {
        fn is_connected(&self) -> bool {
            self.pipe.is_some()
        }

        fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
            let Some(pipe) = self.pipe.as_mut() else {
                return Err(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "player channel is closed",
                ));
            };
            pipe.write_all(frame)?;
            pipe.flush()
        }

        fn close(&mut self) {
            self.pipe = None;
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::os::unix::net::UnixListener;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn socket_channel_writes_whole_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipc.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let mut channel = connect(path.to_str().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();

        channel.send_frame(b"{\"command\":[\"stop\"]}\n").unwrap();
        let mut line = String::new();
        BufReader::new(server).read_line(&mut line).unwrap();
        assert_eq!(line, "{\"command\":[\"stop\"]}\n");
        assert!(channel.is_connected());

        channel.close();
        assert!(!channel.is_connected());
        assert!(channel.send_frame(b"x\n").is_err());
        channel.close();
    }

    #[test]
    fn socket_channel_notices_peer_hangup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipc.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let channel = connect(path.to_str().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        drop(server);

        let deadline = Instant::now() + Duration::from_secs(2);
        while channel.is_connected() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!channel.is_connected());
    }

    #[test]
    fn connect_fails_without_listener() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sock");
        assert!(connect(path.to_str().unwrap()).is_err());
    }
}
