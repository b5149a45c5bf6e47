//! Lead, contact and report read models.
//!
//! # Invariants
//! - `Lead.external_id` is unique across all leads.
//! - A contact always references an existing lead and source; its operator
//!   is `None` when no operator was eligible at intake time.

use super::operator::OperatorId;
use super::source::SourceId;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Store-assigned lead identifier.
pub type LeadId = i64;

/// Store-assigned contact identifier.
pub type ContactId = i64;

/// A unique external entity identified by `external_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub external_id: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// One interaction event tied to a lead and source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub lead_id: LeadId,
    pub source_id: SourceId,
    pub operator_id: Option<OperatorId>,
    pub text: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Insert shape for a contact; ids are resolved by intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub lead_id: LeadId,
    pub source_id: SourceId,
    pub operator_id: Option<OperatorId>,
    pub text: Option<String>,
}

/// Inbound contact as received from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub external_id: String,
    pub source_id: SourceId,
    #[serde(default)]
    pub text: Option<String>,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.external_id.trim().is_empty() {
            return Err(ValidationError::BlankExternalId);
        }
        Ok(())
    }
}

/// Outcome of contact intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub contact_id: ContactId,
    /// Display name of the assigned operator, `None` when nobody was eligible.
    pub operator: Option<String>,
    pub lead_id: LeadId,
}

/// Contact with source and operator names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReportRow {
    pub contact_id: ContactId,
    pub lead_id: LeadId,
    pub source: Option<String>,
    pub operator: Option<String>,
}
