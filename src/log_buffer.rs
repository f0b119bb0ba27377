//! In-memory ring of log lines.
//!
//! While the terminal is in the alternate screen nothing may write to
//! stderr, so the tracing subscriber routes its output here and the host
//! paints the tail of the ring in a log pane.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

const DEFAULT_MAX_LINES: usize = 2000;
static GLOBAL_LOG: OnceLock<LogBuffer> = OnceLock::new();

/// Install `buffer` as the process-wide log sink. Only the first call wins.
pub fn set_global_log_buffer(buffer: LogBuffer) -> bool {
    GLOBAL_LOG.set(buffer).is_ok()
}

pub fn global_log_buffer() -> Option<LogBuffer> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct Ring {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl Ring {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Shared handle to a bounded list of lines. Clones see the same ring.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    inner: Arc<Mutex<Ring>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Ring {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut ring) = self.inner.lock() {
            ring.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|ring| ring.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The newest `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(ring) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = ring.lines.len().saturating_sub(count);
        ring.lines.iter().skip(skip).cloned().collect()
    }

    pub fn writer(&self) -> LogWriter {
        LogWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// `io::Write` adapter that splits bytes into lines.
///
/// A partial line is held until its newline arrives or the writer is
/// flushed or dropped.
#[derive(Debug)]
pub struct LogWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl LogWriter {
    fn push_complete_lines(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let drained: Vec<u8> = self.pending.drain(..=pos).collect();
        for line in String::from_utf8_lossy(&drained).split('\n') {
            if !line.is_empty() {
                self.buffer.push(line.trim_end_matches('\r'));
            }
        }
    }

    fn push_rest(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        self.buffer.push(line);
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.push_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_complete_lines();
        self.push_rest();
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.push_rest();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_keeps_newest_lines() {
        let buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {i}"));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.tail(2), vec!["line 3", "line 4"]);
        assert_eq!(buffer.tail(10).first().map(String::as_str), Some("line 2"));
    }

    #[test]
    fn writer_splits_lines_and_holds_partials() {
        let buffer = LogBuffer::default();
        let mut writer = buffer.writer();
        writer.write_all(b"panel opened\npanel cl").unwrap();
        assert_eq!(buffer.tail(5), vec!["panel opened"]);
        writer.write_all(b"osed\r\n").unwrap();
        assert_eq!(buffer.tail(5), vec!["panel opened", "panel closed"]);
        writer.write_all(b"dangling").unwrap();
        drop(writer);
        assert_eq!(buffer.tail(1), vec!["dangling"]);
    }
}
