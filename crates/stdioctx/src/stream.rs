//! Stream capability traits.
//!
//! These traits are the narrow surface that every redirected stream,
//! and every delegating proxy, is implemented against. They deliberately
//! omit the convenience overloads and mark/reset machinery of richer
//! stream APIs: anything the interception layer must forward has to
//! appear here, so the surface is kept minimal.
//!
//! All methods take `&self`; implementations synchronize internally so
//! a stream can be shared across threads behind an `Arc`.

use std::io;
use std::sync::Arc;

/// A byte-oriented output stream.
///
/// `write` has write-all semantics: on success the entire buffer has
/// been accepted.
pub trait ByteSink: Send + Sync {
    /// Write the entire buffer.
    fn write(&self, buf: &[u8]) -> io::Result<()>;

    /// Write a single byte.
    fn write_u8(&self, byte: u8) -> io::Result<()> {
        self.write(std::slice::from_ref(&byte))
    }

    /// Flush buffered data down the chain.
    fn flush(&self) -> io::Result<()>;

    /// Close the sink. Defaults to a flush; sinks with no separate
    /// resource to release need not override this.
    fn close(&self) -> io::Result<()> {
        self.flush()
    }
}

/// A byte-oriented input stream.
pub trait ByteSource: Send + Sync {
    /// Read into the buffer, returning the number of bytes read.
    /// Returns `Ok(0)` at end of input.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Skip up to `n` bytes, returning the number actually skipped.
    fn skip(&self, n: u64) -> io::Result<u64> {
        let mut scratch = [0u8; 512];
        let mut skipped = 0u64;
        while skipped < n {
            let want = (n - skipped).min(scratch.len() as u64) as usize;
            let got = self.read(&mut scratch[..want])?;
            if got == 0 {
                break;
            }
            skipped += got as u64;
        }
        Ok(skipped)
    }

    /// Number of bytes readable without blocking. Sources that cannot
    /// know report zero.
    fn available(&self) -> io::Result<usize> {
        Ok(0)
    }

    /// Close the source.
    fn close(&self) -> io::Result<()> {
        Ok(())
    }
}

/// A text-oriented output sink.
pub trait TextSink: Send + Sync {
    /// Write a string slice.
    fn write_str(&self, text: &str) -> io::Result<()>;

    /// Flush buffered text down the chain.
    fn flush(&self) -> io::Result<()>;

    /// Close the sink. Defaults to a flush.
    fn close(&self) -> io::Result<()> {
        self.flush()
    }
}

impl<T: TextSink + ?Sized> TextSink for Box<T> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }

    fn close(&self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T: TextSink + ?Sized> TextSink for Arc<T> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }

    fn close(&self) -> io::Result<()> {
        (**self).close()
    }
}
