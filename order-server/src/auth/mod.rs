//! Request identity and ownership enforcement
//!
//! Identity arrives on trusted gateway headers (`x-user-id`,
//! `x-user-role`). Every scoped read or mutation goes through
//! [`OwnershipGuard`] before touching the store.

mod context;
mod extractor;
mod guard;

pub use context::OwnershipContext;
pub use guard::{OwnershipGuard, ScopeFilter};
