//! Line-buffering log sink and its backend contract.
//!
//! [`LoggingTextSink`] accumulates text and emits one log record per
//! line-feed to a [`LineLogger`] backend at a fixed severity.
//! [`capture_sink`] composes it under a [`DecodingSink`], producing a
//! ready-made byte sink that turns a redirected stream into log
//! records.
//!
//! Partial lines are dropped, not flushed: `flush` and `close` are
//! deliberate no-ops, so an unterminated trailing line stays buffered
//! until a future line-feed or is lost when the sink is discarded.

use crate::decode::DecodingSink;
use crate::stream::TextSink;
use crate::StdioError;
use parking_lot::Mutex;
use serde::Deserialize;
use std::io;
use tracing::Level;

/// Backend accepting one line of text plus a severity level.
///
/// The backend identity (category, destination) is resolved when the
/// implementation is constructed, not per record.
pub trait LineLogger: Send + Sync {
    /// Emit one complete line as a log record.
    fn log(&self, level: Level, line: &str);

    /// Whether records will go anywhere at all. A sink over a disabled
    /// backend discards its input without buffering.
    fn enabled(&self) -> bool {
        true
    }
}

/// [`LineLogger`] emitting through `tracing`.
///
/// `tracing` has no logger registry to look a category up in, so the
/// category given at construction is carried as a structured field on
/// every record.
pub struct TracingLineLogger {
    category: String,
}

impl TracingLineLogger {
    /// Creates a logger emitting under the given category.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    /// The category records are emitted under.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl LineLogger for TracingLineLogger {
    fn log(&self, level: Level, line: &str) {
        let category = self.category.as_str();
        if level == Level::ERROR {
            tracing::error!(target: "stdioctx::capture", category, "{line}");
        } else if level == Level::WARN {
            tracing::warn!(target: "stdioctx::capture", category, "{line}");
        } else if level == Level::INFO {
            tracing::info!(target: "stdioctx::capture", category, "{line}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "stdioctx::capture", category, "{line}");
        } else {
            tracing::trace!(target: "stdioctx::capture", category, "{line}");
        }
    }
}

/// Text sink emitting one log record per buffered line.
///
/// Every `'\n'` emits the text accumulated since the previous emission
/// point (exclusive of the line feed) as a single record at the fixed
/// severity. With no backend, or a disabled one, the sink is a black
/// hole: input is silently discarded, which is a defined behavior, not
/// an error.
pub struct LoggingTextSink<L: LineLogger> {
    logger: Option<L>,
    level: Level,
    buffer: Mutex<String>,
}

impl<L: LineLogger> LoggingTextSink<L> {
    /// Creates a sink logging each line to `logger` at `level`.
    ///
    /// A backend reporting itself disabled is dropped up front; the
    /// sink then discards everything.
    #[must_use]
    pub fn new(logger: L, level: Level) -> Self {
        Self {
            logger: logger.enabled().then_some(logger),
            level,
            buffer: Mutex::new(String::new()),
        }
    }

    /// Creates a sink with no backend: a black hole.
    #[must_use]
    pub fn disabled(level: Level) -> Self {
        Self {
            logger: None,
            level,
            buffer: Mutex::new(String::new()),
        }
    }

    /// The severity records are emitted at.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }
}

impl<L: LineLogger> TextSink for LoggingTextSink<L> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        let Some(logger) = &self.logger else {
            return Ok(());
        };
        let mut buffer = self.buffer.lock();
        let mut rest = text;
        while let Some(pos) = rest.find('\n') {
            buffer.push_str(&rest[..pos]);
            logger.log(self.level, &buffer);
            buffer.clear();
            rest = &rest[pos + 1..];
        }
        buffer.push_str(rest);
        Ok(())
    }

    // Partial lines are dropped, not flushed.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Ready-made capture sink: decode bridge over a line-buffering sink
/// over the `tracing` backend.
pub type CaptureSink = DecodingSink<LoggingTextSink<TracingLineLogger>>;

/// Creates a byte sink that decodes UTF-8 and logs one record per line
/// under `category` at `level`.
#[must_use]
pub fn capture_sink(category: impl Into<String>, level: Level) -> CaptureSink {
    DecodingSink::new(LoggingTextSink::new(TracingLineLogger::new(category), level))
}

/// Configuration for a capture sink.
///
/// Deserializable so hosts can embed it in their own config files:
///
/// ```toml
/// category = "deployment.web"
/// level = "warn"
/// encoding = "iso-8859-1"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Category the records are emitted under.
    pub category: String,
    /// Severity level name (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Encoding label; UTF-8 when absent.
    pub encoding: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            category: "stdio".to_string(),
            level: "info".to_string(),
            encoding: None,
        }
    }
}

/// Creates a capture sink from a configuration.
///
/// # Errors
///
/// Returns [`StdioError::InvalidArgument`] for an unknown severity
/// level or encoding label.
pub fn capture_sink_with_config(config: &CaptureConfig) -> Result<CaptureSink, StdioError> {
    let level: Level = config.level.parse().map_err(|_| {
        StdioError::InvalidArgument(format!("unknown log level: {}", config.level))
    })?;
    let sink = LoggingTextSink::new(TracingLineLogger::new(config.category.clone()), level);
    match &config.encoding {
        Some(label) => DecodingSink::for_label(sink, label),
        None => Ok(DecodingSink::new(sink)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::ByteSink;
    use std::sync::Arc;

    /// Backend recording every emitted record.
    #[derive(Clone, Default)]
    struct Capture {
        records: Arc<Mutex<Vec<String>>>,
    }

    impl Capture {
        fn records(&self) -> Vec<String> {
            self.records.lock().clone()
        }
    }

    impl LineLogger for Capture {
        fn log(&self, _level: Level, line: &str) {
            self.records.lock().push(line.to_string());
        }
    }

    /// Backend that reports itself disabled.
    #[derive(Clone, Default)]
    struct Disabled {
        records: Arc<Mutex<Vec<String>>>,
    }

    impl LineLogger for Disabled {
        fn log(&self, _level: Level, line: &str) {
            self.records.lock().push(line.to_string());
        }

        fn enabled(&self) -> bool {
            false
        }
    }

    #[test]
    fn one_record_per_line_feed() {
        let capture = Capture::default();
        let sink = LoggingTextSink::new(capture.clone(), Level::INFO);

        sink.write_str("first\nsecond\nthird").expect("write should succeed");

        assert_eq!(capture.records(), vec!["first", "second"]);
    }

    #[test]
    fn trailing_text_stays_buffered() {
        let capture = Capture::default();
        let sink = LoggingTextSink::new(capture.clone(), Level::INFO);

        sink.write_str("partial").expect("write should succeed");
        assert!(capture.records().is_empty());

        sink.write_str(" line\n").expect("write should succeed");
        assert_eq!(capture.records(), vec!["partial line"]);
    }

    #[test]
    fn empty_lines_emit_empty_records() {
        let capture = Capture::default();
        let sink = LoggingTextSink::new(capture.clone(), Level::INFO);

        sink.write_str("\n\n").expect("write should succeed");

        assert_eq!(capture.records(), vec!["", ""]);
    }

    #[test]
    fn flush_does_not_emit_partial_lines() {
        let capture = Capture::default();
        let sink = LoggingTextSink::new(capture.clone(), Level::INFO);

        sink.write_str("held back").expect("write should succeed");
        sink.flush().expect("flush should succeed");
        sink.close().expect("close should succeed");

        assert!(capture.records().is_empty());

        // The buffered text is still there for the next line feed.
        sink.write_str("\n").expect("write should succeed");
        assert_eq!(capture.records(), vec!["held back"]);
    }

    #[test]
    fn disabled_backend_discards_everything() {
        let disabled = Disabled::default();
        let records = Arc::clone(&disabled.records);
        let sink = LoggingTextSink::new(disabled, Level::INFO);

        sink.write_str("gone\nforever\n").expect("write should succeed");

        assert!(records.lock().is_empty());
    }

    #[test]
    fn disabled_constructor_discards_everything() {
        let sink = LoggingTextSink::<Capture>::disabled(Level::INFO);
        sink.write_str("gone\n").expect("write should succeed");
    }

    #[test]
    fn invalid_byte_then_line_feed_through_the_bridge() {
        let capture = Capture::default();
        let sink = DecodingSink::new(LoggingTextSink::new(capture.clone(), Level::INFO));

        // 0xFF is invalid UTF-8: one record "?A", remainder "B" buffered.
        sink.write(&[0xFF, b'A', b'\n', b'B']).expect("write should succeed");
        sink.flush().expect("flush should succeed");

        assert_eq!(capture.records(), vec!["?A"]);

        // The remainder surfaces with the next line feed.
        sink.write(b"\n").expect("write should succeed");
        sink.flush().expect("flush should succeed");
        assert_eq!(capture.records(), vec!["?A", "B"]);
    }

    #[test]
    fn capture_config_default_parses() {
        let config = CaptureConfig::default();
        let sink = capture_sink_with_config(&config).expect("default config is valid");
        sink.write(b"ok\n").expect("write should succeed");
        sink.flush().expect("flush should succeed");
    }

    #[test]
    fn capture_config_rejects_unknown_level() {
        let config = CaptureConfig {
            level: "loud".to_string(),
            ..CaptureConfig::default()
        };

        let err = capture_sink_with_config(&config)
            .err()
            .expect("unknown level must fail");
        assert!(
            matches!(err, StdioError::InvalidArgument(_)),
            "got: {err:?}"
        );
    }

    #[test]
    fn capture_config_rejects_unknown_encoding() {
        let config = CaptureConfig {
            encoding: Some("klingon".to_string()),
            ..CaptureConfig::default()
        };

        let err = capture_sink_with_config(&config)
            .err()
            .expect("unknown encoding must fail");
        assert!(
            matches!(err, StdioError::InvalidArgument(_)),
            "got: {err:?}"
        );
    }

    #[test]
    fn tracing_logger_keeps_its_category() {
        let logger = TracingLineLogger::new("deployment.web");
        assert_eq!(logger.category(), "deployment.web");
    }
}
