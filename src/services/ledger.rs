//! Ledger service
//!
//! Read-side operations: the cumulative envelope snapshot of a month and the
//! running savings totals. Both load the user's whole history in one store
//! call and run the fold over it.

use crate::error::EnvelopeResult;
use crate::ledger::{cumulative_snapshot, total_savings};
use crate::models::{EnvelopeSnapshot, MonthId, SavingsTotals, UserId};

use super::LedgerContext;

/// Service for computed envelope balances
pub struct LedgerService<'a> {
    context: &'a LedgerContext,
}

impl<'a> LedgerService<'a> {
    pub fn new(context: &'a LedgerContext) -> Self {
        Self { context }
    }

    /// Envelope states of `target` with every earlier month's carry applied
    ///
    /// An uninitialized month is not an error: its states are all zero.
    pub fn compute_cumulative_envelopes(
        &self,
        user: &UserId,
        target: MonthId,
    ) -> EnvelopeResult<EnvelopeSnapshot> {
        let store = self.context.store();
        let ordering = self.context.ordering();

        let revision = match self.context.cache() {
            Some(cache) => {
                let revision = store.revision(user)?;
                if let Some(snapshot) = cache.get(user, target, ordering, revision)? {
                    log::debug!("Snapshot cache hit for {} {} at revision {}", user, target, revision);
                    return Ok(snapshot);
                }
                log::debug!("Snapshot cache miss for {} {} at revision {}", user, target, revision);
                Some(revision)
            }
            None => None,
        };

        let history = store.load_history(user)?;
        let snapshot = cumulative_snapshot(self.context.catalog(), &history, target, ordering);

        if let (Some(cache), Some(revision)) = (self.context.cache(), revision) {
            cache.put(user, ordering, revision, snapshot.clone())?;
        }
        Ok(snapshot)
    }

    /// Savings totals as of the current calendar month
    pub fn compute_total_savings(&self, user: &UserId) -> EnvelopeResult<SavingsTotals> {
        self.compute_total_savings_as_of(user, MonthId::current())
    }

    /// Savings totals as of `current`
    ///
    /// `realized` is the savings balance at the close of the last month
    /// before `current`; `potential` also includes `current` itself.
    pub fn compute_total_savings_as_of(
        &self,
        user: &UserId,
        current: MonthId,
    ) -> EnvelopeResult<SavingsTotals> {
        let history = self.context.store().load_history(user)?;
        let totals = total_savings(self.context.catalog(), &history, current, self.context.ordering());
        log::debug!(
            "Savings for {} as of {}: realized {}, potential {}",
            user,
            current,
            totals.realized,
            totals.potential
        );
        Ok(totals)
    }
}
