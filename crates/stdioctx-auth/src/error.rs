//! Access denied error type.
//!
//! [`AccessDenied`] covers both failure modes of the gate: a missing
//! capability, and a veto from a custom policy that holds the
//! capability check itself to stricter rules.

use crate::Capability;
use thiserror::Error;

/// Error returned when the authorization gate rejects an operation.
///
/// Callers can match on the variant to determine whether the denial
/// came from the capability set or from a custom policy decision.
///
/// # Example
///
/// ```
/// use stdioctx_auth::{AccessDenied, Capability};
///
/// let err = AccessDenied::CapabilityDenied {
///     operation: "install".to_string(),
///     required: Capability::INSTALL,
///     available: Capability::CREATE_CONTEXT,
/// };
///
/// assert!(err.to_string().contains("install"));
/// ```
#[derive(Debug, Error)]
pub enum AccessDenied {
    /// Operation requires a capability the caller does not hold.
    #[error("capability denied: '{operation}' requires {required}, available: {available}")]
    CapabilityDenied {
        /// The operation that was attempted.
        operation: String,
        /// The capability required for the operation.
        required: Capability,
        /// The capabilities actually available to the caller.
        available: Capability,
    },

    /// A custom policy rejected the operation for its own reasons.
    #[error("policy denied: '{operation}': {reason}")]
    PolicyDenied {
        /// The operation that was attempted.
        operation: String,
        /// Policy-supplied reason for the denial.
        reason: String,
    },
}

impl AccessDenied {
    /// Returns the operation identifier the denial applies to.
    #[must_use]
    pub fn operation(&self) -> &str {
        match self {
            Self::CapabilityDenied { operation, .. } | Self::PolicyDenied { operation, .. } => {
                operation
            }
        }
    }
}
