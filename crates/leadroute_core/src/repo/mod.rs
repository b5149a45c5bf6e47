//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from selection and intake logic.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.
//! - Repositories borrow a connection (or a transaction through deref) and
//!   never own one.

pub mod contact_repo;
pub mod error;
pub mod lead_repo;
pub mod operator_repo;
pub mod source_repo;

pub use error::{RecordRef, RepoError, RepoResult};
