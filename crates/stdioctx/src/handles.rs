//! Public handles to the redirectable standard streams.
//!
//! Application code writes to [`stdout`]/[`stderr`] and reads from
//! [`stdin`] exactly as it would use `std::io`; each operation loads
//! the current global handle, so the same call site transparently hits
//! the real stream when the layer is uninstalled and the delegating
//! proxy when it is installed.

use crate::install;
use crate::stream::{ByteSink, ByteSource};
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// A handle to the redirectable standard output.
#[must_use]
pub fn stdout() -> Stdout {
    Stdout { _priv: () }
}

/// A handle to the redirectable standard error.
#[must_use]
pub fn stderr() -> Stderr {
    Stderr { _priv: () }
}

/// A handle to the redirectable standard input.
#[must_use]
pub fn stdin() -> Stdin {
    Stdin { _priv: () }
}

/// Handle to the redirectable standard output. See [`stdout`].
pub struct Stdout {
    _priv: (),
}

impl Stdout {
    /// The sink currently installed in the global output slot.
    ///
    /// Exposed for identity assertions; ordinary callers use the
    /// `io::Write` impl or [`print`](Self::print).
    #[must_use]
    pub fn raw(&self) -> Arc<dyn ByteSink> {
        install::output_handle()
    }

    /// Write formatted text as a single forwarded operation.
    pub fn print(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.raw().write(fmt::format(args).as_bytes())
    }

    /// Write formatted text followed by a line feed, as a single
    /// forwarded operation.
    pub fn println(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut text = fmt::format(args);
        text.push('\n');
        self.raw().write(text.as_bytes())
    }
}

impl Write for Stdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.raw().write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.raw().flush()
    }
}

/// Handle to the redirectable standard error. See [`stderr`].
pub struct Stderr {
    _priv: (),
}

impl Stderr {
    /// The sink currently installed in the global error slot.
    #[must_use]
    pub fn raw(&self) -> Arc<dyn ByteSink> {
        install::error_handle()
    }

    /// Write formatted text as a single forwarded operation.
    pub fn print(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.raw().write(fmt::format(args).as_bytes())
    }

    /// Write formatted text followed by a line feed, as a single
    /// forwarded operation.
    pub fn println(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut text = fmt::format(args);
        text.push('\n');
        self.raw().write(text.as_bytes())
    }
}

impl Write for Stderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.raw().write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.raw().flush()
    }
}

/// Handle to the redirectable standard input. See [`stdin`].
pub struct Stdin {
    _priv: (),
}

impl Stdin {
    /// The source currently installed in the global input slot.
    #[must_use]
    pub fn raw(&self) -> Arc<dyn ByteSource> {
        install::input_handle()
    }

    /// Skip up to `n` bytes of input.
    pub fn skip(&self, n: u64) -> io::Result<u64> {
        self.raw().skip(n)
    }

    /// Bytes readable without blocking, where the source can tell.
    pub fn available(&self) -> io::Result<usize> {
        self.raw().available()
    }
}

impl Read for Stdin {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.raw().read(buf)
    }
}
