//! Adapters over the process's real standard streams.
//!
//! The system context (the one well-known [`StdioContext`] wrapping
//! the original streams) is captured lazily, exactly once, and always
//! before the interception layer replaces the global handles (the
//! install path forces the capture first). Uninstall restores these
//! very `Arc` values, so handle identity survives an
//! install/uninstall round trip.

use crate::context::StdioContext;
use crate::stream::{ByteSink, ByteSource};
use std::io::{self, Read, Write};
use std::sync::{Arc, LazyLock};

/// The real standard output.
#[derive(Debug, Default)]
pub(crate) struct SystemStdout;

impl ByteSink for SystemStdout {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// The real standard error.
#[derive(Debug, Default)]
pub(crate) struct SystemStderr;

impl ByteSink for SystemStderr {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

/// The real standard input.
///
/// `available` reports zero: the portable stdin handle gives no
/// non-blocking readability signal.
#[derive(Debug, Default)]
pub(crate) struct SystemStdin;

impl ByteSource for SystemStdin {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        io::stdin().lock().read(buf)
    }
}

static SYSTEM: LazyLock<Arc<StdioContext>> = LazyLock::new(|| {
    Arc::new(StdioContext::from_parts(
        Arc::new(SystemStdin),
        Arc::new(SystemStdout),
        Arc::new(SystemStderr),
    ))
});

/// The captured system context.
pub(crate) fn system_context() -> Arc<StdioContext> {
    Arc::clone(&SYSTEM)
}
