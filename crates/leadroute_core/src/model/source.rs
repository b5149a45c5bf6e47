//! Source and per-source weight assignment models.
//!
//! # Invariants
//! - At most one assignment exists per `(source_id, operator_id)` pair.
//! - Stored weights are in `0..=MAX_WEIGHT`; a zero weight keeps the
//!   assignment but gives it no chance in the draw.

use super::operator::OperatorId;
use super::validation::{require_name, ValidationError};
use serde::{Deserialize, Serialize};

/// Largest weight accepted for one assignment.
///
/// Keeps the sum of every weight on a source far below `u64::MAX`.
pub const MAX_WEIGHT: i64 = 1_000_000;

/// Store-assigned source identifier.
pub type SourceId = i64;

/// Channel/origin from which leads arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub name: String,
}

/// Create request for a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSource {
    pub name: String,
}

impl NewSource {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("source", &self.name)
    }
}

/// Relative selection weight of one operator for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightAssignment {
    pub id: i64,
    pub source_id: SourceId,
    pub operator_id: OperatorId,
    pub weight: i64,
}

/// One entry of a bulk weight assignment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightInput {
    pub operator_id: OperatorId,
    pub weight: i64,
}

impl WeightInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_weight(self.weight)
    }
}

/// Rejects weights outside `0..=MAX_WEIGHT`.
pub fn validate_weight(weight: i64) -> Result<(), ValidationError> {
    if weight < 0 {
        return Err(ValidationError::NegativeWeight(weight));
    }
    if weight > MAX_WEIGHT {
        return Err(ValidationError::WeightTooLarge(weight));
    }
    Ok(())
}
