//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Append contacts and serve the per-operator load count used by selection.
//! - Build the name-resolved contact report.
//!
//! # Invariants
//! - Contacts are insert-only.
//! - `count_for_operator` counts every contact ever assigned (lifetime load).

use super::error::RepoResult;
use crate::model::lead::{Contact, ContactReportRow, NewContact};
use crate::model::operator::OperatorId;
use rusqlite::{params, Connection, Row};

const CONTACT_SELECT_SQL: &str =
    "SELECT id, lead_id, source_id, operator_id, text, created_at FROM contacts";

/// Repository interface for contacts.
pub trait ContactRepository {
    fn create_contact(&self, contact: &NewContact) -> RepoResult<Contact>;
    fn count_for_operator(&self, operator_id: OperatorId) -> RepoResult<i64>;
    fn list_contacts(&self) -> RepoResult<Vec<Contact>>;
    fn report(&self) -> RepoResult<Vec<ContactReportRow>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &NewContact) -> RepoResult<Contact> {
        self.conn.execute(
            "INSERT INTO contacts (lead_id, source_id, operator_id, text)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                contact.lead_id,
                contact.source_id,
                contact.operator_id,
                contact.text.as_deref()
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        let created = self.conn.query_row(
            &format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_contact_row,
        )?;
        Ok(created)
    }

    fn count_for_operator(&self, operator_id: OperatorId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE operator_id = ?1;",
            [operator_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let contacts = stmt
            .query_map([], parse_contact_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn report(&self) -> RepoResult<Vec<ContactReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                c.id AS contact_id,
                c.lead_id AS lead_id,
                s.name AS source,
                o.name AS operator
             FROM contacts c
             LEFT JOIN sources s ON s.id = c.source_id
             LEFT JOIN operators o ON o.id = c.operator_id
             ORDER BY c.id ASC;",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ContactReportRow {
                    contact_id: row.get("contact_id")?,
                    lead_id: row.get("lead_id")?,
                    source: row.get("source")?,
                    operator: row.get("operator")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        lead_id: row.get("lead_id")?,
        source_id: row.get("source_id")?,
        operator_id: row.get("operator_id")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}
