//! Write-time validation errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for any record about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required name is empty or whitespace only.
    BlankName(&'static str),
    /// Operator load limit below zero.
    NegativeLoadLimit(i64),
    /// Assignment weight below zero.
    NegativeWeight(i64),
    /// Assignment weight above `MAX_WEIGHT`.
    WeightTooLarge(i64),
    /// Lead external id is empty or whitespace only.
    BlankExternalId,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName(record) => write!(f, "{record} name must not be blank"),
            Self::NegativeLoadLimit(value) => {
                write!(f, "load_limit must be >= 0, got {value}")
            }
            Self::NegativeWeight(value) => write!(f, "weight must be >= 0, got {value}"),
            Self::WeightTooLarge(value) => {
                write!(f, "weight must be <= {}, got {value}", crate::model::source::MAX_WEIGHT)
            }
            Self::BlankExternalId => write!(f, "external_id must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects names that are empty after trimming.
pub(crate) fn require_name(record: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankName(record));
    }
    Ok(())
}
