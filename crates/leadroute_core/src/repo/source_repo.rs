//! Source and weight-assignment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist sources and the per-source operator weights used by selection.
//! - Keep `(source_id, operator_id)` unique through upsert semantics.
//!
//! # Invariants
//! - `upsert_weight` replaces the weight of an existing pair in place.
//! - Weight listing order is `id ASC`, so draws see a stable candidate order.

use super::error::{RecordRef, RepoError, RepoResult};
use crate::model::operator::OperatorId;
use crate::model::source::{
    validate_weight, NewSource, Source, SourceId, WeightAssignment, WeightInput,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const WEIGHT_SELECT_SQL: &str =
    "SELECT id, source_id, operator_id, weight FROM source_operator_weights";

/// Repository interface for sources.
pub trait SourceRepository {
    fn create_source(&self, source: &NewSource) -> RepoResult<Source>;
    fn get_source(&self, id: SourceId) -> RepoResult<Option<Source>>;
    fn list_sources(&self) -> RepoResult<Vec<Source>>;
}

/// Repository interface for per-source operator weights.
pub trait WeightRepository {
    /// Inserts or replaces the weight for one `(source, operator)` pair.
    fn upsert_weight(&self, source_id: SourceId, input: &WeightInput)
        -> RepoResult<WeightAssignment>;
    /// Updates an existing pair; `NotFound` when the pair is absent.
    fn update_weight(
        &self,
        source_id: SourceId,
        operator_id: OperatorId,
        weight: i64,
    ) -> RepoResult<WeightAssignment>;
    /// Deletes an existing pair; `NotFound` when the pair is absent.
    fn delete_weight(&self, source_id: SourceId, operator_id: OperatorId) -> RepoResult<()>;
    fn list_weights(&self, source_id: SourceId) -> RepoResult<Vec<WeightAssignment>>;
}

/// SQLite-backed source and weight repository.
pub struct SqliteSourceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSourceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SourceRepository for SqliteSourceRepository<'_> {
    fn create_source(&self, source: &NewSource) -> RepoResult<Source> {
        source.validate()?;

        let name = source.name.trim();
        self.conn
            .execute("INSERT INTO sources (name) VALUES (?1);", [name])?;

        Ok(Source {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn get_source(&self, id: SourceId) -> RepoResult<Option<Source>> {
        let source = self
            .conn
            .query_row(
                "SELECT id, name FROM sources WHERE id = ?1;",
                [id],
                parse_source_row,
            )
            .optional()?;
        Ok(source)
    }

    fn list_sources(&self) -> RepoResult<Vec<Source>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM sources ORDER BY id ASC;")?;
        let sources = stmt
            .query_map([], parse_source_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sources)
    }
}

impl WeightRepository for SqliteSourceRepository<'_> {
    fn upsert_weight(
        &self,
        source_id: SourceId,
        input: &WeightInput,
    ) -> RepoResult<WeightAssignment> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO source_operator_weights (source_id, operator_id, weight)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(source_id, operator_id) DO UPDATE SET weight = excluded.weight;",
            params![source_id, input.operator_id, input.weight],
        )?;

        load_weight(self.conn, source_id, input.operator_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "weight for source {source_id} operator {} missing after upsert",
                input.operator_id
            ))
        })
    }

    fn update_weight(
        &self,
        source_id: SourceId,
        operator_id: OperatorId,
        weight: i64,
    ) -> RepoResult<WeightAssignment> {
        validate_weight(weight)?;

        let changed = self.conn.execute(
            "UPDATE source_operator_weights
             SET weight = ?3
             WHERE source_id = ?1 AND operator_id = ?2;",
            params![source_id, operator_id, weight],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Weight {
                source_id,
                operator_id,
            }));
        }

        load_weight(self.conn, source_id, operator_id)?.ok_or(RepoError::NotFound(
            RecordRef::Weight {
                source_id,
                operator_id,
            },
        ))
    }

    fn delete_weight(&self, source_id: SourceId, operator_id: OperatorId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM source_operator_weights
             WHERE source_id = ?1 AND operator_id = ?2;",
            params![source_id, operator_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Weight {
                source_id,
                operator_id,
            }));
        }

        Ok(())
    }

    fn list_weights(&self, source_id: SourceId) -> RepoResult<Vec<WeightAssignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WEIGHT_SELECT_SQL} WHERE source_id = ?1 ORDER BY id ASC;"
        ))?;
        let weights = stmt
            .query_map([source_id], parse_weight_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(weights)
    }
}

fn load_weight(
    conn: &Connection,
    source_id: SourceId,
    operator_id: OperatorId,
) -> RepoResult<Option<WeightAssignment>> {
    let weight = conn
        .query_row(
            &format!("{WEIGHT_SELECT_SQL} WHERE source_id = ?1 AND operator_id = ?2;"),
            params![source_id, operator_id],
            parse_weight_row,
        )
        .optional()?;
    Ok(weight)
}

fn parse_source_row(row: &Row<'_>) -> rusqlite::Result<Source> {
    Ok(Source {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn parse_weight_row(row: &Row<'_>) -> rusqlite::Result<WeightAssignment> {
    Ok(WeightAssignment {
        id: row.get("id")?,
        source_id: row.get("source_id")?,
        operator_id: row.get("operator_id")?,
        weight: row.get("weight")?,
    })
}
