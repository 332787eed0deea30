//! Delegating proxies and the reentrancy marker.
//!
//! While the interception layer is installed, the global handles hold
//! these proxies. Every operation resolves the current context through
//! the active selector *at call time*, never at construction, and
//! forwards to the context's corresponding stream.
//!
//! Output-side forwarding is guarded by a thread-local reentrancy
//! marker: when a forwarded write ends up back in the interception
//! layer on the same call stack (a logging backend writing to what it
//! believes is standard output, for example), the nested call is a
//! silent no-op instead of an unbounded recursion. The guard is
//! applied by a single helper so no forwarding operation can miss it.
//! Input-side forwarding carries no guard; reads cannot recurse into
//! writes in this design.

use crate::install::current_context;
use crate::stream::{ByteSink, ByteSource};
use std::cell::Cell;
use std::io;
use std::marker::PhantomData;
use std::sync::Arc;

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// RAII marker scoping "this thread is inside a forwarded stdio call".
///
/// Cleared on drop, so the marker is released on every exit path,
/// including panics and error returns.
pub(crate) struct ForwardGuard {
    _not_send: PhantomData<*const ()>,
}

impl ForwardGuard {
    /// Set the marker for the calling thread.
    ///
    /// Returns `None` when the marker is already set; the caller must
    /// turn the operation into a silent no-op with a neutral return
    /// value.
    pub(crate) fn enter() -> Option<Self> {
        FORWARDING.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(ForwardGuard {
                    _not_send: PhantomData,
                })
            }
        })
    }
}

impl Drop for ForwardGuard {
    fn drop(&mut self) {
        FORWARDING.with(|flag| flag.set(false));
    }
}

/// Which output stream of the resolved context a proxy forwards to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputKind {
    Out,
    Err,
}

/// Output proxy: resolves the active context per call and forwards.
pub(crate) struct DelegatingSink {
    kind: OutputKind,
}

impl DelegatingSink {
    pub(crate) fn new(kind: OutputKind) -> Self {
        Self { kind }
    }

    fn target(&self) -> Arc<dyn ByteSink> {
        let context = current_context();
        match self.kind {
            OutputKind::Out => Arc::clone(context.output()),
            OutputKind::Err => Arc::clone(context.error()),
        }
    }
}

impl ByteSink for DelegatingSink {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        let Some(_guard) = ForwardGuard::enter() else {
            return Ok(());
        };
        self.target().write(buf)
    }

    fn write_u8(&self, byte: u8) -> io::Result<()> {
        let Some(_guard) = ForwardGuard::enter() else {
            return Ok(());
        };
        self.target().write_u8(byte)
    }

    fn flush(&self) -> io::Result<()> {
        let Some(_guard) = ForwardGuard::enter() else {
            return Ok(());
        };
        self.target().flush()
    }

    fn close(&self) -> io::Result<()> {
        let Some(_guard) = ForwardGuard::enter() else {
            return Ok(());
        };
        self.target().close()
    }
}

/// Input proxy: resolves the active context per call and forwards.
pub(crate) struct DelegatingSource;

impl ByteSource for DelegatingSource {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        current_context().input().read(buf)
    }

    fn skip(&self, n: u64) -> io::Result<u64> {
        current_context().input().skip(n)
    }

    fn available(&self) -> io::Result<usize> {
        current_context().input().available()
    }

    fn close(&self) -> io::Result<()> {
        current_context().input().close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_blocks_nested_entry() {
        let outer = ForwardGuard::enter();
        assert!(outer.is_some());
        assert!(ForwardGuard::enter().is_none());
        drop(outer);
        assert!(ForwardGuard::enter().is_some());
    }

    #[test]
    fn guard_releases_on_panic() {
        let unwound = std::panic::catch_unwind(|| {
            let _guard = ForwardGuard::enter().expect("marker should be clear");
            panic!("forwarding failed");
        });
        assert!(unwound.is_err());

        // The unwind must have cleared the marker.
        assert!(ForwardGuard::enter().is_some());
    }
}
