//! Operator repository contract and SQLite implementation.
//!
//! # Invariants
//! - Operators are created and updated, never deleted.
//! - Listing order is `id ASC`.

use super::error::{RecordRef, RepoError, RepoResult};
use crate::model::operator::{NewOperator, Operator, OperatorId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const OPERATOR_SELECT_SQL: &str = "SELECT id, name, active, load_limit FROM operators";

/// Repository interface for operator records.
pub trait OperatorRepository {
    fn create_operator(&self, operator: &NewOperator) -> RepoResult<Operator>;
    fn update_operator(&self, operator: &Operator) -> RepoResult<()>;
    fn get_operator(&self, id: OperatorId) -> RepoResult<Option<Operator>>;
    fn list_operators(&self) -> RepoResult<Vec<Operator>>;
}

/// SQLite-backed operator repository.
pub struct SqliteOperatorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOperatorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl OperatorRepository for SqliteOperatorRepository<'_> {
    fn create_operator(&self, operator: &NewOperator) -> RepoResult<Operator> {
        operator.validate()?;

        self.conn.execute(
            "INSERT INTO operators (name, active, load_limit) VALUES (?1, ?2, ?3);",
            params![
                operator.name.trim(),
                operator.active,
                operator.load_limit
            ],
        )?;

        Ok(Operator {
            id: self.conn.last_insert_rowid(),
            name: operator.name.trim().to_string(),
            active: operator.active,
            load_limit: operator.load_limit,
        })
    }

    fn update_operator(&self, operator: &Operator) -> RepoResult<()> {
        operator.validate()?;

        let changed = self.conn.execute(
            "UPDATE operators
             SET name = ?1, active = ?2, load_limit = ?3
             WHERE id = ?4;",
            params![
                operator.name.trim(),
                operator.active,
                operator.load_limit,
                operator.id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Operator(operator.id)));
        }

        Ok(())
    }

    fn get_operator(&self, id: OperatorId) -> RepoResult<Option<Operator>> {
        let operator = self
            .conn
            .query_row(
                &format!("{OPERATOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_operator_row,
            )
            .optional()?;
        Ok(operator)
    }

    fn list_operators(&self) -> RepoResult<Vec<Operator>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{OPERATOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let operators = stmt
            .query_map([], parse_operator_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(operators)
    }
}

fn parse_operator_row(row: &Row<'_>) -> rusqlite::Result<Operator> {
    Ok(Operator {
        id: row.get("id")?,
        name: row.get("name")?,
        active: row.get("active")?,
        load_limit: row.get("load_limit")?,
    })
}
