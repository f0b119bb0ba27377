//! Subscriber setup for the crate's `tracing` events.
//!
//! Output goes to the global `LogBuffer` when one is installed, so a
//! full-screen host can show it in a pane. Otherwise it goes to stderr.

use std::io::{self, Write};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::log_buffer::{LogWriter, global_log_buffer};

/// Environment variable read by `init_default` to pick the level.
pub const LOG_LEVEL_ENV: &str = "VELVET_LOG";

/// Per-event destination picked by `SinkSelector`.
pub enum LogSink {
    Buffer(LogWriter),
    Stderr(io::Stderr),
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Buffer(writer) => writer.write(buf),
            LogSink::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Buffer(writer) => writer.flush(),
            LogSink::Stderr(stderr) => stderr.flush(),
        }
    }
}

/// Chooses the sink each time an event is written, so a buffer installed
/// after the subscriber still receives output.
#[derive(Clone, Copy, Debug, Default)]
pub struct SinkSelector;

impl<'a> MakeWriter<'a> for SinkSelector {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match global_log_buffer() {
            Some(buffer) => LogSink::Buffer(buffer.writer()),
            None => LogSink::Stderr(io::stderr()),
        }
    }
}

/// Level named by `value` (`trace`, `debug`, `info`, `warn`, `error`, any
/// case), or `fallback` when it is missing or unknown.
pub fn parse_level(value: Option<&str>, fallback: Level) -> Level {
    value
        .and_then(|value| value.trim().parse::<Level>().ok())
        .unwrap_or(fallback)
}

/// Install a compact subscriber that records events up to `max_level`.
/// Later calls are no-ops.
pub fn init(max_level: Level) {
    let buffered = global_log_buffer().is_some();
    let installed = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(SinkSelector)
        .with_ansi(!buffered)
        .with_target(false)
        .without_time()
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(%max_level, buffered, "tracing initialised");
    }
}

/// `init` with the level from `VELVET_LOG`, defaulting to `debug`.
pub fn init_default() {
    let from_env = std::env::var(LOG_LEVEL_ENV).ok();
    init(parse_level(from_env.as_deref(), Level::DEBUG));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing_falls_back() {
        assert_eq!(parse_level(Some("warn"), Level::DEBUG), Level::WARN);
        assert_eq!(parse_level(Some(" TRACE "), Level::DEBUG), Level::TRACE);
        assert_eq!(parse_level(Some("loud"), Level::INFO), Level::INFO);
        assert_eq!(parse_level(None, Level::ERROR), Level::ERROR);
    }

    #[test]
    fn sink_writes_to_stderr_without_buffer() {
        // No global buffer is installed by the unit tests.
        let mut sink = SinkSelector.make_writer();
        assert!(matches!(sink, LogSink::Stderr(_)));
        assert!(sink.flush().is_ok());
    }
}
