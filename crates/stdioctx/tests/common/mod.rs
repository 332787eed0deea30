//! Shared test helpers.
#![allow(dead_code)]

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use stdioctx::{ByteSink, LineLogger};
use tracing::Level;

/// Byte sink recording everything written to it.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    data: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }
}

impl ByteSink for CaptureBuffer {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        self.data.lock().extend_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Line-logger backend recording every emitted record.
#[derive(Clone, Default)]
pub struct CaptureLogger {
    records: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CaptureLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().clone()
    }
}

impl LineLogger for CaptureLogger {
    fn log(&self, level: Level, line: &str) {
        self.records.lock().push((level, line.to_string()));
    }
}
