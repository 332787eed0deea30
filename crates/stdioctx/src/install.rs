//! The global interception layer.
//!
//! This module is the only place that touches process-wide mutable
//! state: the installation state machine, the active selector, and the
//! three global stream handles. Everything else in the crate receives
//! streams by explicit parameter passing.
//!
//! ## Installation States
//!
//! ```text
//! Uninstalled → Installing → Installed → Uninstalling → Uninstalled
//! ```
//!
//! Transitions happen by atomic compare-and-set; a competing install
//! or uninstall whose source state does not match fails immediately
//! with [`StdioError::IllegalState`]; it never blocks, and no caller
//! can observe `Installing` or `Uninstalling` as a stable state.
//!
//! The three handles live in a single atomic slot, so a reader always
//! sees either all proxies or all originals. The selector lives in its
//! own atomic slot: resolving the current context never takes a lock.

use crate::context::StdioContext;
use crate::gate;
use crate::proxy::{DelegatingSink, DelegatingSource, OutputKind};
use crate::selector::{ContextSelector, SimpleContextSelector};
use crate::stream::{ByteSink, ByteSource};
use crate::system::system_context;
use crate::StdioError;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock};
use stdioctx_auth::Capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum InstallState {
    Uninstalled = 0,
    Installing = 1,
    Installed = 2,
    Uninstalling = 3,
}

static STATE: AtomicU8 = AtomicU8::new(InstallState::Uninstalled as u8);

struct SelectorSlot {
    selector: Arc<dyn ContextSelector>,
}

static SELECTOR: LazyLock<ArcSwap<SelectorSlot>> = LazyLock::new(|| {
    ArcSwap::from_pointee(SelectorSlot {
        selector: Arc::new(SimpleContextSelector::new(system_context())),
    })
});

pub(crate) struct HandleSet {
    pub(crate) input: Arc<dyn ByteSource>,
    pub(crate) output: Arc<dyn ByteSink>,
    pub(crate) error: Arc<dyn ByteSink>,
}

fn system_handles() -> HandleSet {
    let context = system_context();
    HandleSet {
        input: Arc::clone(context.input()),
        output: Arc::clone(context.output()),
        error: Arc::clone(context.error()),
    }
}

// Initialized from the system context, so the original handles are
// captured before any proxy can be stored.
static HANDLES: LazyLock<ArcSwap<HandleSet>> =
    LazyLock::new(|| ArcSwap::from_pointee(system_handles()));

/// Install the interception layer, replacing the global stream handles
/// with delegating proxies.
///
/// # Errors
///
/// - [`StdioError::AccessDenied`] when the active policy does not
///   grant [`Capability::INSTALL`].
/// - [`StdioError::IllegalState`] when the layer is already installed
///   (or an install/uninstall is in flight on another thread).
pub fn install() -> Result<(), StdioError> {
    gate::check("install", Capability::INSTALL)?;
    if STATE
        .compare_exchange(
            InstallState::Uninstalled as u8,
            InstallState::Installing as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        )
        .is_err()
    {
        return Err(StdioError::IllegalState("already installed"));
    }
    HANDLES.store(Arc::new(HandleSet {
        input: Arc::new(DelegatingSource),
        output: Arc::new(DelegatingSink::new(OutputKind::Out)),
        error: Arc::new(DelegatingSink::new(OutputKind::Err)),
    }));
    STATE.store(InstallState::Installed as u8, Ordering::SeqCst);
    tracing::info!("stdio interception installed");
    Ok(())
}

/// Uninstall the interception layer, restoring the original captured
/// system streams (same handle identity, not merely equivalent
/// behavior).
///
/// # Errors
///
/// - [`StdioError::AccessDenied`] when the active policy does not
///   grant [`Capability::INSTALL`].
/// - [`StdioError::IllegalState`] when the layer is not installed.
pub fn uninstall() -> Result<(), StdioError> {
    gate::check("uninstall", Capability::INSTALL)?;
    if STATE
        .compare_exchange(
            InstallState::Installed as u8,
            InstallState::Uninstalling as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        )
        .is_err()
    {
        return Err(StdioError::IllegalState("already uninstalled"));
    }
    HANDLES.store(Arc::new(system_handles()));
    STATE.store(InstallState::Uninstalled as u8, Ordering::SeqCst);
    tracing::info!("stdio interception uninstalled");
    Ok(())
}

/// Whether the interception layer is currently installed.
#[must_use]
pub fn is_installed() -> bool {
    STATE.load(Ordering::SeqCst) == InstallState::Installed as u8
}

/// Replace the process-wide context selector.
///
/// Effective immediately for all subsequent forwarded calls, including
/// calls already in flight on other threads; there is no snapshot.
///
/// # Errors
///
/// Returns [`StdioError::AccessDenied`] when the active policy does
/// not grant [`Capability::SET_SELECTOR`].
pub fn set_selector(selector: Arc<dyn ContextSelector>) -> Result<(), StdioError> {
    gate::check("set_selector", Capability::SET_SELECTOR)?;
    SELECTOR.store(Arc::new(SelectorSlot { selector }));
    tracing::debug!("stdio context selector replaced");
    Ok(())
}

/// Resolve the currently active context through the selector.
#[must_use]
pub fn current_context() -> Arc<StdioContext> {
    SELECTOR.load().selector.context()
}

pub(crate) fn input_handle() -> Arc<dyn ByteSource> {
    Arc::clone(&HANDLES.load().input)
}

pub(crate) fn output_handle() -> Arc<dyn ByteSink> {
    Arc::clone(&HANDLES.load().output)
}

pub(crate) fn error_handle() -> Arc<dyn ByteSink> {
    Arc::clone(&HANDLES.load().error)
}

/// Install the interception layer and return a guard that uninstalls
/// it on drop.
///
/// # Errors
///
/// Same as [`install`].
pub fn install_guard() -> Result<InstallGuard, StdioError> {
    install()?;
    Ok(InstallGuard { _priv: () })
}

/// Guard uninstalling the interception layer when dropped.
///
/// If the layer was already uninstalled by hand, the drop logs a
/// warning instead of panicking.
pub struct InstallGuard {
    _priv: (),
}

impl Drop for InstallGuard {
    fn drop(&mut self) {
        if let Err(err) = uninstall() {
            tracing::warn!(%err, "uninstall on guard drop failed");
        }
    }
}
