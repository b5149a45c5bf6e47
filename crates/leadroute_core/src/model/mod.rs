//! Domain model for lead routing.
//!
//! # Responsibility
//! - Define the records persisted by the routing store.
//! - Own write-time validation rules shared by repositories and services.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `i64` id.
//! - Operators are never hard-deleted; contacts are immutable once written.

pub mod lead;
pub mod operator;
pub mod source;
pub mod validation;
