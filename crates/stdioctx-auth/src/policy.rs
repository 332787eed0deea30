//! Access policy trait.
//!
//! Defines [`AccessPolicy`] — the abstract authorization gate invoked
//! before each privileged stdio operation. The trait lives here so the
//! core crate and host applications can both reference it without
//! circular dependencies.
//!
//! ```text
//! AccessPolicy trait (stdioctx-auth)   <- abstract, no runtime deps
//!          │
//!          ├── GrantAll      <- default environment, grants everything
//!          ├── StaticPolicy  <- fixed grant set
//!          └── host impls    <- container/sandbox policies, test stubs
//! ```

use crate::{AccessDenied, Capability};

/// Abstract authorization gate for privileged stdio operations.
///
/// The gate is invoked with an operation identifier (`"create_context"`,
/// `"set_selector"`, `"install"`, `"uninstall"`) and the capability the
/// operation requires. Returning `Ok(())` permits the operation;
/// returning an [`AccessDenied`] aborts it at the call site.
///
/// # Example
///
/// ```
/// use stdioctx_auth::{AccessDenied, AccessPolicy, Capability};
///
/// /// Denies everything once the host has sealed its streams.
/// struct Sealed;
///
/// impl AccessPolicy for Sealed {
///     fn check(&self, operation: &str, _required: Capability) -> Result<(), AccessDenied> {
///         Err(AccessDenied::PolicyDenied {
///             operation: operation.to_string(),
///             reason: "streams are sealed".to_string(),
///         })
///     }
/// }
///
/// let policy = Sealed;
/// assert!(policy.check("install", Capability::INSTALL).is_err());
/// ```
pub trait AccessPolicy: Send + Sync {
    /// Check whether the named operation, requiring the given
    /// capability, is permitted.
    fn check(&self, operation: &str, required: Capability) -> Result<(), AccessDenied>;
}

/// Policy that grants every operation.
///
/// This is the default: an environment with no configured policy
/// behaves as if no gate were present.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantAll;

impl AccessPolicy for GrantAll {
    fn check(&self, _operation: &str, _required: Capability) -> Result<(), AccessDenied> {
        Ok(())
    }
}

/// Policy with a fixed grant set.
///
/// Permits an operation when the granted set contains the required
/// capability; denies with [`AccessDenied::CapabilityDenied`] otherwise.
#[derive(Debug, Clone, Copy)]
pub struct StaticPolicy {
    granted: Capability,
}

impl StaticPolicy {
    /// Creates a policy granting exactly the given capability set.
    #[must_use]
    pub fn new(granted: Capability) -> Self {
        Self { granted }
    }

    /// The granted capability set.
    #[must_use]
    pub fn granted(&self) -> Capability {
        self.granted
    }
}

impl AccessPolicy for StaticPolicy {
    fn check(&self, operation: &str, required: Capability) -> Result<(), AccessDenied> {
        if self.granted.contains(required) {
            Ok(())
        } else {
            Err(AccessDenied::CapabilityDenied {
                operation: operation.to_string(),
                required,
                available: self.granted,
            })
        }
    }
}
