//! Capability-based permission model.
//!
//! Defines the logical capabilities that control *what* privileged
//! stdio operations a caller can perform.
//!
//! Each capability gates one operation family on the interception
//! layer. Install and uninstall share a single capability, mirroring
//! the fact that whoever may replace the process streams must also be
//! able to put them back.
//!
//! # Example
//!
//! ```
//! use stdioctx_auth::Capability;
//!
//! // Full access (default environment)
//! let all = Capability::ALL;
//! assert!(all.contains(Capability::INSTALL));
//!
//! // A host that only permits context creation
//! let create_only = Capability::CREATE_CONTEXT;
//! assert!(!create_only.contains(Capability::SET_SELECTOR));
//!
//! // Narrowing: derived = parent ∩ requested
//! let parent = Capability::CREATE_CONTEXT | Capability::SET_SELECTOR;
//! let requested = Capability::SET_SELECTOR | Capability::INSTALL;
//! assert_eq!(Capability::inherit(parent, requested), Capability::SET_SELECTOR);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Logical capabilities gating the privileged stdio operations.
    ///
    /// | Capability | Operations |
    /// |------------|------------|
    /// | [`CREATE_CONTEXT`](Self::CREATE_CONTEXT) | `create_context` |
    /// | [`SET_SELECTOR`](Self::SET_SELECTOR) | `set_selector` |
    /// | [`INSTALL`](Self::INSTALL) | `install`, `uninstall` |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capability: u8 {
        /// Create a new stdio context: `create_context`
        const CREATE_CONTEXT = 0b001;
        /// Replace the process-wide context selector: `set_selector`
        const SET_SELECTOR   = 0b010;
        /// Install or uninstall the interception layer: `install`, `uninstall`
        const INSTALL        = 0b100;
    }
}

impl Capability {
    /// All capabilities.
    pub const ALL: Self = Self::CREATE_CONTEXT
        .union(Self::SET_SELECTOR)
        .union(Self::INSTALL);

    /// Computes the effective capabilities for a derived grant.
    ///
    /// Returns the intersection of parent and requested capabilities.
    /// A derived grant can never exceed its parent.
    #[must_use]
    pub fn inherit(parent: Self, requested: Self) -> Self {
        parent & requested
    }

    /// Returns a human-readable list of capability names.
    ///
    /// # Example
    ///
    /// ```
    /// use stdioctx_auth::Capability;
    ///
    /// let caps = Capability::CREATE_CONTEXT | Capability::INSTALL;
    /// let names = caps.names();
    /// assert!(names.contains(&"CREATE_CONTEXT"));
    /// assert!(names.contains(&"INSTALL"));
    /// ```
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::CREATE_CONTEXT) {
            names.push("CREATE_CONTEXT");
        }
        if self.contains(Self::SET_SELECTOR) {
            names.push("SET_SELECTOR");
        }
        if self.contains(Self::INSTALL) {
            names.push("INSTALL");
        }
        names
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        write!(f, "{}", self.names().join("|"))
    }
}
