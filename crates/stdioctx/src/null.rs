//! Null streams.
//!
//! Trivial leaf streams: [`NullSink`] discards every write and
//! [`NullSource`] always reports end of input. Useful as the quiet
//! parts of a context that should only capture one direction.

use crate::stream::{ByteSink, ByteSource};
use std::io;

/// Output sink that discards all writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ByteSink for NullSink {
    fn write(&self, _buf: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Input source that is always at end of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSource;

impl ByteSource for NullSource {
    fn read(&self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}
