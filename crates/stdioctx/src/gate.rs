//! Process-wide authorization gate slot.
//!
//! Holds the active [`AccessPolicy`] behind an atomic reference so
//! privileged operations can consult it without taking a lock. The
//! default environment grants all operations.

use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};
use stdioctx_auth::{AccessDenied, AccessPolicy, Capability, GrantAll};

struct GateSlot {
    policy: Arc<dyn AccessPolicy>,
}

static POLICY: LazyLock<ArcSwap<GateSlot>> = LazyLock::new(|| {
    ArcSwap::from_pointee(GateSlot {
        policy: Arc::new(GrantAll),
    })
});

/// Replace the process-wide access policy.
///
/// Effective immediately for all subsequent privileged operations.
pub fn set_access_policy(policy: Arc<dyn AccessPolicy>) {
    POLICY.store(Arc::new(GateSlot { policy }));
    tracing::debug!("stdio access policy replaced");
}

/// The currently active access policy.
#[must_use]
pub fn access_policy() -> Arc<dyn AccessPolicy> {
    Arc::clone(&POLICY.load().policy)
}

/// Run the gate for one privileged operation.
pub(crate) fn check(operation: &'static str, required: Capability) -> Result<(), AccessDenied> {
    POLICY.load().policy.check(operation, required)
}
