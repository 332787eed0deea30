//! Stdio contexts.
//!
//! A [`StdioContext`] is an immutable triple of input source, output
//! sink, and error sink: one logical console identity. Multiple
//! deployments inside one process each hold their own context; the
//! interception layer forwards every standard-stream operation to
//! whichever context the active selector reports.

use crate::gate;
use crate::stream::{ByteSink, ByteSource};
use crate::system::system_context;
use crate::StdioError;
use std::fmt;
use std::sync::Arc;
use stdioctx_auth::Capability;

/// A context for console input and output.
///
/// Contexts are immutable: once created, the three streams never
/// change. Dropping the last reference releases the streams through
/// normal `Arc` ownership.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stdioctx::{ByteSink, NullSink, NullSource, StdioContext};
///
/// let quiet = StdioContext::create(
///     Arc::new(NullSource),
///     Arc::new(NullSink),
///     Arc::new(NullSink),
/// )
/// .expect("default environment grants context creation");
///
/// quiet.output().write(b"dropped").unwrap();
/// ```
pub struct StdioContext {
    input: Arc<dyn ByteSource>,
    output: Arc<dyn ByteSink>,
    error: Arc<dyn ByteSink>,
}

impl StdioContext {
    /// Internal constructor, bypassing the gate. Only the system
    /// context capture uses this.
    pub(crate) fn from_parts(
        input: Arc<dyn ByteSource>,
        output: Arc<dyn ByteSink>,
        error: Arc<dyn ByteSink>,
    ) -> Self {
        Self {
            input,
            output,
            error,
        }
    }

    /// Create a console I/O context.
    ///
    /// # Errors
    ///
    /// Returns [`StdioError::AccessDenied`] when the active policy does
    /// not grant [`Capability::CREATE_CONTEXT`].
    pub fn create(
        input: Arc<dyn ByteSource>,
        output: Arc<dyn ByteSink>,
        error: Arc<dyn ByteSink>,
    ) -> Result<Arc<Self>, StdioError> {
        gate::check("create_context", Capability::CREATE_CONTEXT)?;
        Ok(Arc::new(Self::from_parts(input, output, error)))
    }

    /// The system context wrapping the process's original streams,
    /// captured once before any interception.
    #[must_use]
    pub fn system() -> Arc<Self> {
        system_context()
    }

    /// The input source for this context.
    #[must_use]
    pub fn input(&self) -> &Arc<dyn ByteSource> {
        &self.input
    }

    /// The output sink for this context.
    #[must_use]
    pub fn output(&self) -> &Arc<dyn ByteSink> {
        &self.output
    }

    /// The error sink for this context.
    #[must_use]
    pub fn error(&self) -> &Arc<dyn ByteSink> {
        &self.error
    }
}

impl fmt::Debug for StdioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdioContext").finish_non_exhaustive()
    }
}
