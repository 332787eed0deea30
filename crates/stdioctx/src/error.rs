//! Error taxonomy for the redirection layer.
//!
//! All errors are synchronous and reported at the call site; there is
//! no background error channel. Reentrant forwarded calls and writes
//! to a sink with no configured backend are deliberately *not* errors;
//! they are defined absorbing behaviors, documented on the types that
//! exhibit them.

use thiserror::Error;

/// Error type for the stdio redirection layer.
#[derive(Debug, Error)]
pub enum StdioError {
    /// The authorization gate rejected a privileged operation.
    ///
    /// Never retried automatically.
    #[error(transparent)]
    AccessDenied(#[from] stdioctx_auth::AccessDenied),

    /// The interception layer was asked to transition from a state it
    /// is not in (double install, uninstall without install).
    ///
    /// Indicates a usage error in the host, not a recoverable
    /// condition.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    /// A required value could not be parsed or resolved (unknown
    /// encoding label, unknown severity level).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An I/O failure propagated from a downstream stream or sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
