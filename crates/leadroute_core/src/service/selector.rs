//! Operator selection for incoming contacts.
//!
//! # Responsibility
//! - Narrow a source's weight assignments down to eligible operators.
//! - Pick one eligible operator with a single weighted random draw.
//!
//! # Invariants
//! - Eligible means: operator exists, `active`, and lifetime contact count
//!   strictly below `load_limit`.
//! - Assignments pointing at a missing operator are skipped silently.
//! - "Nobody eligible" is `Ok(None)`, never an error.
//! - The draw is memoryless; given a seeded RNG it is deterministic.
//! - Weights `<= 0` carry zero probability; if no eligible candidate has a
//!   positive weight the draw yields `None`.
//! - Weights above `MAX_WEIGHT` (only possible in rows written outside the
//!   admin service) are clamped to it.

use crate::model::operator::Operator;
use crate::model::source::{SourceId, MAX_WEIGHT};
use crate::repo::contact_repo::{ContactRepository, SqliteContactRepository};
use crate::repo::operator_repo::{OperatorRepository, SqliteOperatorRepository};
use crate::repo::source_repo::{SqliteSourceRepository, WeightRepository};
use crate::repo::RepoResult;
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rusqlite::Connection;

/// An operator that passed the availability and load filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub operator: Operator,
    /// Assignment weight for the source being routed.
    pub weight: i64,
    /// Lifetime contact count at evaluation time.
    pub current_load: i64,
}

/// Picks one item with probability proportional to `weight_of(item)`.
///
/// Non-positive weights count as zero and weights are clamped to
/// `MAX_WEIGHT`, so the total cannot overflow. Returns `None` for an empty slice or
/// when every weight is zero.
pub fn draw_weighted<'a, T, R>(
    items: &'a [T],
    weight_of: impl Fn(&T) -> i64,
    rng: &mut R,
) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let weights: Vec<u64> = items
        .iter()
        .map(|item| u64::try_from(weight_of(item).min(MAX_WEIGHT)).unwrap_or(0))
        .collect();
    let index = WeightedIndex::<u64>::new(&weights).ok()?;
    items.get(index.sample(rng))
}

/// Weighted operator selector over repository contracts.
pub struct OperatorSelector<W, O, C> {
    weights: W,
    operators: O,
    contacts: C,
}

impl<'conn>
    OperatorSelector<
        SqliteSourceRepository<'conn>,
        SqliteOperatorRepository<'conn>,
        SqliteContactRepository<'conn>,
    >
{
    /// Builds a selector reading from SQLite repositories on one connection.
    ///
    /// Pass a transaction (through deref) to make the load read part of the
    /// caller's unit of work.
    pub fn for_connection(conn: &'conn Connection) -> Self {
        Self::new(
            SqliteSourceRepository::new(conn),
            SqliteOperatorRepository::new(conn),
            SqliteContactRepository::new(conn),
        )
    }
}

impl<W, O, C> OperatorSelector<W, O, C>
where
    W: WeightRepository,
    O: OperatorRepository,
    C: ContactRepository,
{
    pub fn new(weights: W, operators: O, contacts: C) -> Self {
        Self {
            weights,
            operators,
            contacts,
        }
    }

    /// Returns every operator currently eligible for `source_id`, in
    /// assignment order.
    pub fn eligible_candidates(&self, source_id: SourceId) -> RepoResult<Vec<Candidate>> {
        let assignments = self.weights.list_weights(source_id)?;
        let mut eligible = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            let Some(operator) = self.operators.get_operator(assignment.operator_id)? else {
                debug!(
                    "event=operator_skip module=selector reason=missing_operator source_id={} operator_id={}",
                    source_id, assignment.operator_id
                );
                continue;
            };
            if !operator.active {
                continue;
            }

            let current_load = self.contacts.count_for_operator(operator.id)?;
            if !operator.accepts_load(current_load) {
                continue;
            }

            eligible.push(Candidate {
                operator,
                weight: assignment.weight,
                current_load,
            });
        }

        Ok(eligible)
    }

    /// Selects one eligible operator for `source_id`, or `None`.
    pub fn select<R>(&self, source_id: SourceId, rng: &mut R) -> RepoResult<Option<Operator>>
    where
        R: Rng + ?Sized,
    {
        let eligible = self.eligible_candidates(source_id)?;
        let chosen = draw_weighted(&eligible, |candidate| candidate.weight, rng);

        debug!(
            "event=operator_select module=selector status=ok source_id={} eligible={} operator_id={}",
            source_id,
            eligible.len(),
            chosen.map_or_else(|| "none".to_string(), |c| c.operator.id.to_string())
        );

        Ok(chosen.map(|candidate| candidate.operator.clone()))
    }
}
