//! Administrative use-cases: operators, sources, weights, listings, report.
//!
//! # Responsibility
//! - Provide CRUD entry points over the routing repositories.
//! - Turn "row absent" outcomes into `NotFound` with the missing record.
//!
//! # Invariants
//! - Bulk weight assignment is all-or-nothing.
//! - Weight writes require both the source and the operator to exist.

use crate::model::lead::{Contact, ContactReportRow, Lead};
use crate::model::operator::{NewOperator, Operator, OperatorId, OperatorPatch};
use crate::model::source::{NewSource, Source, SourceId, WeightAssignment, WeightInput};
use crate::repo::contact_repo::{ContactRepository, SqliteContactRepository};
use crate::repo::lead_repo::{LeadRepository, SqliteLeadRepository};
use crate::repo::operator_repo::{OperatorRepository, SqliteOperatorRepository};
use crate::repo::source_repo::{SourceRepository, SqliteSourceRepository, WeightRepository};
use crate::repo::{RecordRef, RepoError, RepoResult};
use log::info;
use rusqlite::Connection;

/// Administrative service bound to one connection.
pub struct AdminService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> AdminService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn operators(&self) -> SqliteOperatorRepository<'conn> {
        SqliteOperatorRepository::new(self.conn)
    }

    fn sources(&self) -> SqliteSourceRepository<'conn> {
        SqliteSourceRepository::new(self.conn)
    }

    pub fn create_operator(&self, operator: &NewOperator) -> RepoResult<Operator> {
        let created = self.operators().create_operator(operator)?;
        info!(
            "event=operator_create module=admin status=ok operator_id={} active={} load_limit={}",
            created.id, created.active, created.load_limit
        );
        Ok(created)
    }

    pub fn list_operators(&self) -> RepoResult<Vec<Operator>> {
        self.operators().list_operators()
    }

    pub fn get_operator(&self, id: OperatorId) -> RepoResult<Operator> {
        self.operators()
            .get_operator(id)?
            .ok_or(RepoError::NotFound(RecordRef::Operator(id)))
    }

    /// Applies a partial update and returns the stored result.
    pub fn update_operator(&self, id: OperatorId, patch: &OperatorPatch) -> RepoResult<Operator> {
        let mut operator = self.get_operator(id)?;
        operator.apply(patch);
        self.operators().update_operator(&operator)?;
        info!(
            "event=operator_update module=admin status=ok operator_id={} active={} load_limit={}",
            operator.id, operator.active, operator.load_limit
        );
        self.get_operator(id)
    }

    pub fn create_source(&self, source: &NewSource) -> RepoResult<Source> {
        let created = self.sources().create_source(source)?;
        info!(
            "event=source_create module=admin status=ok source_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn list_sources(&self) -> RepoResult<Vec<Source>> {
        self.sources().list_sources()
    }

    pub fn get_source(&self, id: SourceId) -> RepoResult<Source> {
        self.sources()
            .get_source(id)?
            .ok_or(RepoError::NotFound(RecordRef::Source(id)))
    }

    /// Upserts every `(operator_id, weight)` pair for `source_id` in one
    /// transaction. Nothing is written if any entry is invalid or dangling.
    pub fn assign_weights(
        &self,
        source_id: SourceId,
        inputs: &[WeightInput],
    ) -> RepoResult<Vec<WeightAssignment>> {
        for input in inputs {
            input.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let sources = SqliteSourceRepository::new(&tx);
        let operators = SqliteOperatorRepository::new(&tx);

        if sources.get_source(source_id)?.is_none() {
            return Err(RepoError::NotFound(RecordRef::Source(source_id)));
        }

        let mut assigned = Vec::with_capacity(inputs.len());
        for input in inputs {
            if operators.get_operator(input.operator_id)?.is_none() {
                return Err(RepoError::NotFound(RecordRef::Operator(input.operator_id)));
            }
            assigned.push(sources.upsert_weight(source_id, input)?);
        }
        tx.commit()?;

        info!(
            "event=weights_assign module=admin status=ok source_id={} count={}",
            source_id,
            assigned.len()
        );
        Ok(assigned)
    }

    pub fn list_weights(&self, source_id: SourceId) -> RepoResult<Vec<WeightAssignment>> {
        self.get_source(source_id)?;
        self.sources().list_weights(source_id)
    }

    pub fn update_weight(
        &self,
        source_id: SourceId,
        operator_id: OperatorId,
        weight: i64,
    ) -> RepoResult<WeightAssignment> {
        let updated = self.sources().update_weight(source_id, operator_id, weight)?;
        info!(
            "event=weight_update module=admin status=ok source_id={} operator_id={} weight={}",
            source_id, operator_id, weight
        );
        Ok(updated)
    }

    pub fn delete_weight(&self, source_id: SourceId, operator_id: OperatorId) -> RepoResult<()> {
        self.sources().delete_weight(source_id, operator_id)?;
        info!(
            "event=weight_delete module=admin status=ok source_id={} operator_id={}",
            source_id, operator_id
        );
        Ok(())
    }

    pub fn list_leads(&self) -> RepoResult<Vec<Lead>> {
        SqliteLeadRepository::new(self.conn).list_leads()
    }

    pub fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        SqliteContactRepository::new(self.conn).list_contacts()
    }

    pub fn report(&self) -> RepoResult<Vec<ContactReportRow>> {
        SqliteContactRepository::new(self.conn).report()
    }
}
