//! Repository error type shared by every routing table.

use crate::db::DbError;
use crate::model::operator::OperatorId;
use crate::model::source::SourceId;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies the record a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Operator(OperatorId),
    Source(SourceId),
    Weight {
        source_id: SourceId,
        operator_id: OperatorId,
    },
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operator(id) => write!(f, "operator {id}"),
            Self::Source(id) => write!(f, "source {id}"),
            Self::Weight {
                source_id,
                operator_id,
            } => write!(f, "weight for source {source_id} operator {operator_id}"),
        }
    }
}

/// Generic repository error for routing persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(RecordRef),
    /// A uniqueness constraint rejected the write.
    Conflict(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(record) => write!(f, "{record} not found"),
            Self::Conflict(message) => write!(f, "conflicting write: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if value.is_unique_violation() {
            return Self::Conflict(value.to_string());
        }
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        DbError::Sqlite(value).into()
    }
}
