//! Permission primitives for the stdioctx redirection layer.
//!
//! This crate defines the authorization gate that guards the privileged
//! operations of the stdio interception layer: creating contexts,
//! swapping the process-wide selector, and installing or uninstalling
//! the interception itself.
//!
//! # Crate Architecture
//!
//! ```text
//! stdioctx-auth  (Capability, AccessPolicy, AccessDenied)  ◄── THIS CRATE
//!      ↑
//! stdioctx       (holds the process-wide policy slot, invokes the
//!                 gate before each privileged operation)
//! ```
//!
//! # Design Principles
//!
//! - **Trait definitions here, implementations in consumers** — this
//!   crate ships only the contract plus the two trivial policies
//!   ([`GrantAll`], [`StaticPolicy`]); hosts with real security
//!   requirements implement [`AccessPolicy`] themselves.
//! - **Deny wins** — a derived capability set can never exceed the set
//!   it was narrowed from.
//! - **Checks are synchronous** — a denied operation fails at the call
//!   site with [`AccessDenied`]; nothing is retried.

pub mod capability;
pub mod error;
pub mod policy;

pub use capability::Capability;
pub use error::AccessDenied;
pub use policy::{AccessPolicy, GrantAll, StaticPolicy};
