//! Operator domain model.
//!
//! # Invariants
//! - `load_limit` caps the lifetime number of contacts assigned to the
//!   operator; it is not a concurrency cap.
//! - `name` is non-blank.

use super::validation::{require_name, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned operator identifier.
pub type OperatorId = i64;

/// Load limit applied when a create request leaves it out.
pub const DEFAULT_LOAD_LIMIT: i64 = 5;

/// An agent eligible to handle contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: OperatorId,
    /// Display name returned by contact intake.
    pub name: String,
    /// Inactive operators are never selected.
    pub active: bool,
    /// Maximum lifetime contact count while still selectable.
    pub load_limit: i64,
}

impl Operator {
    /// Returns whether an operator with `current_load` contacts can take one more.
    pub fn accepts_load(&self, current_load: i64) -> bool {
        self.active && current_load < self.load_limit
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: &OperatorPatch) {
        if let Some(name) = patch.name.as_ref() {
            self.name = name.clone();
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(load_limit) = patch.load_limit {
            self.load_limit = load_limit;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.load_limit)
    }
}

/// Create request for an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOperator {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_load_limit")]
    pub load_limit: i64,
}

impl NewOperator {
    /// Builds a create request with default `active` and `load_limit`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: default_active(),
            load_limit: default_load_limit(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.load_limit)
    }
}

/// Partial update for an operator. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub load_limit: Option<i64>,
}

fn validate_fields(name: &str, load_limit: i64) -> Result<(), ValidationError> {
    require_name("operator", name)?;
    if load_limit < 0 {
        return Err(ValidationError::NegativeLoadLimit(load_limit));
    }
    Ok(())
}

fn default_active() -> bool {
    true
}

fn default_load_limit() -> i64 {
    DEFAULT_LOAD_LIMIT
}
