//! Capture `tracing` output emitted on the current thread.

use std::io;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }

    /// Lines logged at exactly `level`.
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        let tag = level.as_str();
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(tag))
            .map(str::to_string)
            .collect()
    }
}

pub struct LogBufferWriter {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            bytes: Arc::clone(&self.bytes),
        }
    }
}

/// Run `f` with a thread-local subscriber that records everything at
/// `debug` and above, and return its result together with the captured log.
///
/// Only events emitted on the calling thread are seen, so `f` should be
/// synchronous.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogBuffer) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .with_max_level(Level::DEBUG)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    (out, buffer)
}
