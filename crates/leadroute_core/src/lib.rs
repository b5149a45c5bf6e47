//! Core domain logic for lead routing.
//! This crate owns the routing data model, its SQLite store and the operator
//! selection rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::lead::{
    Contact, ContactId, ContactReceipt, ContactReportRow, ContactRequest, Lead, LeadId,
    NewContact,
};
pub use model::operator::{NewOperator, Operator, OperatorId, OperatorPatch, DEFAULT_LOAD_LIMIT};
pub use model::source::{
    NewSource, Source, SourceId, WeightAssignment, WeightInput, MAX_WEIGHT,
};
pub use model::validation::ValidationError;
pub use repo::{RecordRef, RepoError, RepoResult};
pub use service::admin_service::AdminService;
pub use service::intake_service::IntakeService;
pub use service::selector::{draw_weighted, Candidate, OperatorSelector};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
