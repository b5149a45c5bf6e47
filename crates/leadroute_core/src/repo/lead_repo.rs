//! Lead repository contract and SQLite implementation.
//!
//! # Invariants
//! - `external_id` is unique; `get_or_create_lead` never inserts a second row
//!   for an id that already exists.

use super::error::{RepoError, RepoResult};
use crate::model::lead::Lead;
use crate::model::validation::ValidationError;
use rusqlite::{Connection, OptionalExtension, Row};

const LEAD_SELECT_SQL: &str = "SELECT id, external_id, created_at FROM leads";

/// Repository interface for leads.
pub trait LeadRepository {
    /// Returns the lead for `external_id`, inserting it first when absent.
    fn get_or_create_lead(&self, external_id: &str) -> RepoResult<Lead>;
    fn find_lead(&self, external_id: &str) -> RepoResult<Option<Lead>>;
    fn list_leads(&self) -> RepoResult<Vec<Lead>>;
}

/// SQLite-backed lead repository.
pub struct SqliteLeadRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLeadRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LeadRepository for SqliteLeadRepository<'_> {
    fn get_or_create_lead(&self, external_id: &str) -> RepoResult<Lead> {
        if external_id.trim().is_empty() {
            return Err(ValidationError::BlankExternalId.into());
        }

        // Insert-or-ignore keeps the unique index as the single arbiter.
        self.conn.execute(
            "INSERT INTO leads (external_id) VALUES (?1)
             ON CONFLICT(external_id) DO NOTHING;",
            [external_id],
        )?;

        self.find_lead(external_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("lead `{external_id}` missing after upsert"))
        })
    }

    fn find_lead(&self, external_id: &str) -> RepoResult<Option<Lead>> {
        let lead = self
            .conn
            .query_row(
                &format!("{LEAD_SELECT_SQL} WHERE external_id = ?1;"),
                [external_id],
                parse_lead_row,
            )
            .optional()?;
        Ok(lead)
    }

    fn list_leads(&self) -> RepoResult<Vec<Lead>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LEAD_SELECT_SQL} ORDER BY id ASC;"))?;
        let leads = stmt
            .query_map([], parse_lead_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(leads)
    }
}

fn parse_lead_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get("id")?,
        external_id: row.get("external_id")?,
        created_at: row.get("created_at")?,
    })
}
