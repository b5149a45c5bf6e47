//! Contact intake use-case.
//!
//! # Responsibility
//! - Resolve (or create) the lead, choose an operator, persist the contact.
//!
//! # Invariants
//! - The whole intake runs in one `IMMEDIATE` transaction: the load counts
//!   read by selection cannot go stale before the contact is written, and a
//!   failure leaves no lead or contact behind.
//! - An unknown source is rejected before any write.
//! - Lead creation is an insert-or-fetch under the `external_id` unique index.

use crate::model::lead::{ContactReceipt, ContactRequest, NewContact};
use crate::repo::contact_repo::{ContactRepository, SqliteContactRepository};
use crate::repo::lead_repo::{LeadRepository, SqliteLeadRepository};
use crate::repo::source_repo::{SourceRepository, SqliteSourceRepository};
use crate::repo::{RecordRef, RepoError, RepoResult};
use crate::service::selector::OperatorSelector;
use log::{info, warn};
use rand::Rng;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Intake service bound to one connection for one unit of work.
pub struct IntakeService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> IntakeService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Records one inbound contact and assigns an operator when one is eligible.
    ///
    /// # Errors
    /// - `Validation` for a blank `external_id`.
    /// - `NotFound(Source)` when `source_id` does not exist.
    /// - `Conflict` if the lead unique index still rejects the write.
    pub fn create_contact<R>(
        &self,
        request: &ContactRequest,
        rng: &mut R,
    ) -> RepoResult<ContactReceipt>
    where
        R: Rng + ?Sized,
    {
        request.validate()?;
        let started_at = Instant::now();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let receipt = match intake_in_tx(&tx, request, rng) {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(
                    "event=contact_intake module=intake status=error source_id={} duration_ms={} error={}",
                    request.source_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };
        tx.commit()?;

        info!(
            "event=contact_intake module=intake status=ok source_id={} lead_id={} contact_id={} assigned={} duration_ms={}",
            request.source_id,
            receipt.lead_id,
            receipt.contact_id,
            receipt.operator.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(receipt)
    }
}

fn intake_in_tx<R>(
    tx: &Transaction<'_>,
    request: &ContactRequest,
    rng: &mut R,
) -> RepoResult<ContactReceipt>
where
    R: Rng + ?Sized,
{
    let sources = SqliteSourceRepository::new(tx);
    if sources.get_source(request.source_id)?.is_none() {
        return Err(RepoError::NotFound(RecordRef::Source(request.source_id)));
    }

    let lead = SqliteLeadRepository::new(tx).get_or_create_lead(&request.external_id)?;
    let operator = OperatorSelector::for_connection(tx).select(request.source_id, rng)?;

    let contact = SqliteContactRepository::new(tx).create_contact(&NewContact {
        lead_id: lead.id,
        source_id: request.source_id,
        operator_id: operator.as_ref().map(|operator| operator.id),
        text: request.text.clone(),
    })?;

    Ok(ContactReceipt {
        contact_id: contact.id,
        operator: operator.map(|operator| operator.name),
        lead_id: lead.id,
    })
}
