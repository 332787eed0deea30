//! Context selection strategies.
//!
//! A [`ContextSelector`] decides which [`StdioContext`] is "current"
//! each time a forwarded operation resolves its target. Exactly one
//! selector is active process-wide; swapping it is an atomic pointer
//! replace (see [`crate::set_selector`]).
//!
//! Two strategies ship with the crate:
//!
//! - [`SimpleContextSelector`] — fixed binding to one context.
//! - [`ThreadLocalContextSelector`] — per-thread binding with a
//!   process-wide default, for hosts that dedicate threads (or thread
//!   pools) to deployments.

use crate::context::StdioContext;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

/// Strategy returning the currently active stdio context.
///
/// Implementations must always return a context; the `Arc` return type
/// makes an absent value unrepresentable. Selectors are consulted on
/// every forwarded operation, so `context` should be cheap.
pub trait ContextSelector: Send + Sync {
    /// The currently active context.
    fn context(&self) -> Arc<StdioContext>;
}

/// Selector with a fixed binding to one context.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use stdioctx::{SimpleContextSelector, StdioContext};
///
/// let selector = SimpleContextSelector::new(StdioContext::system());
/// selector.install_selector().expect("selector swap is granted");
/// ```
pub struct SimpleContextSelector {
    context: Arc<StdioContext>,
}

impl SimpleContextSelector {
    /// Creates a selector always returning the given context.
    #[must_use]
    pub fn new(context: Arc<StdioContext>) -> Self {
        Self { context }
    }

    /// Attempt to install this selector as the process-wide one.
    ///
    /// Convenience for [`crate::set_selector`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::StdioError::AccessDenied`] when the active
    /// policy does not grant the selector swap.
    pub fn install_selector(self) -> Result<(), crate::StdioError> {
        crate::install::set_selector(Arc::new(self))
    }
}

impl ContextSelector for SimpleContextSelector {
    fn context(&self) -> Arc<StdioContext> {
        Arc::clone(&self.context)
    }
}

thread_local! {
    static BOUND: RefCell<Vec<Arc<StdioContext>>> = const { RefCell::new(Vec::new()) };
}

/// Selector with per-thread bindings over a process-wide default.
///
/// Threads that have not attached a context resolve to the default.
/// Bindings nest: [`attach`](Self::attach) pushes, and dropping the
/// returned guard restores the previous binding. The binding stack is
/// per-thread and shared by all instances of this selector type.
pub struct ThreadLocalContextSelector {
    default: Arc<StdioContext>,
}

impl ThreadLocalContextSelector {
    /// Creates a selector falling back to the given default context.
    #[must_use]
    pub fn new(default: Arc<StdioContext>) -> Self {
        Self { default }
    }

    /// Bind a context to the calling thread until the returned guard
    /// is dropped. Nested attaches restore the previous binding.
    #[must_use]
    pub fn attach(context: Arc<StdioContext>) -> AttachGuard {
        BOUND.with(|bound| bound.borrow_mut().push(context));
        AttachGuard {
            _not_send: PhantomData,
        }
    }
}

impl ContextSelector for ThreadLocalContextSelector {
    fn context(&self) -> Arc<StdioContext> {
        BOUND
            .with(|bound| bound.borrow().last().cloned())
            .unwrap_or_else(|| Arc::clone(&self.default))
    }
}

/// Guard restoring the previous per-thread context binding on drop.
///
/// Not sendable: the binding belongs to the thread that attached it.
pub struct AttachGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for AttachGuard {
    fn drop(&mut self) {
        BOUND.with(|bound| {
            bound.borrow_mut().pop();
        });
    }
}
