//! Per-context redirection of the process standard streams.
//!
//! Multiple logical deployments inside one process each get an
//! independent view of "the" standard streams, even though the OS
//! exposes only one set of global handles. A global substitution layer
//! intercepts every standard-stream operation and forwards it to a
//! dynamically selected context.
//!
//! # Architecture
//!
//! ```text
//! application code
//!       │ write to stdout()/stderr(), read from stdin()
//!       ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │ GlobalInterceptionLayer (install / uninstall)             │
//! │   delegating proxies ── reentrancy marker per thread      │
//! └───────────────┬───────────────────────────────────────────┘
//!                 │ resolve at call time
//!                 ▼
//!          ContextSelector ──► StdioContext { in, out, err }
//!                 │
//!                 ▼
//!          context output sink, e.g.:
//!          DecodingSink (bytes → text, '?' on malformed input)
//!                 │
//!          LoggingTextSink (one record per line)
//!                 │
//!          LineLogger backend (tracing)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stdioctx::{capture_sink, NullSource, SimpleContextSelector, StdioContext};
//! use tracing::Level;
//!
//! # fn main() -> Result<(), stdioctx::StdioError> {
//! // A context that turns both output streams into log records.
//! let context = StdioContext::create(
//!     Arc::new(NullSource),
//!     Arc::new(capture_sink("deployment.web", Level::INFO)),
//!     Arc::new(capture_sink("deployment.web", Level::ERROR)),
//! )?;
//!
//! stdioctx::set_selector(Arc::new(SimpleContextSelector::new(context)))?;
//! let _guard = stdioctx::install_guard()?;
//!
//! // Everything written to the redirectable handles now lands in the
//! // selected context; the guard restores the original streams.
//! use std::io::Write;
//! writeln!(stdioctx::stdout(), "served 12 requests")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! A passive library: no scheduler, no background threads. Bridge and
//! sink instances serialize their buffers on per-instance locks; the
//! process-wide selector and installation state are read through
//! atomics, so resolving the current context never blocks. The
//! reentrancy marker is thread-local and imposes no cross-thread
//! exclusion.

pub mod context;
pub mod decode;
pub mod error;
pub mod gate;
pub mod handles;
pub mod install;
pub mod logging;
pub mod null;
pub mod selector;
pub mod stream;

mod proxy;
mod system;

pub use context::StdioContext;
pub use decode::DecodingSink;
pub use error::StdioError;
pub use gate::{access_policy, set_access_policy};
pub use handles::{stderr, stdin, stdout, Stderr, Stdin, Stdout};
pub use install::{
    current_context, install, install_guard, is_installed, set_selector, uninstall, InstallGuard,
};
pub use logging::{
    capture_sink, capture_sink_with_config, CaptureConfig, CaptureSink, LineLogger,
    LoggingTextSink, TracingLineLogger,
};
pub use null::{NullSink, NullSource};
pub use selector::{
    AttachGuard, ContextSelector, SimpleContextSelector, ThreadLocalContextSelector,
};
pub use stream::{ByteSink, ByteSource, TextSink};

// Re-export the permission primitives so hosts need only one import.
pub use stdioctx_auth::{AccessDenied, AccessPolicy, Capability, GrantAll, StaticPolicy};
