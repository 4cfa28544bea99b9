//! Storage layer for the envelope ledger
//!
//! `LedgerStore` is the collaborator the services read and write through. Two
//! implementations ship with the crate: `MemoryStore` (tests, embedding) and
//! `JsonStore`, which keeps one JSON document per user under the data
//! directory and writes it atomically after every change.
//!
//! Stores are isolation boundaries: nothing one user writes is visible
//! through another user's calls.

pub mod file_io;
pub mod json;
pub mod ledger_data;
pub mod memory;

pub use file_io::{read_json, read_json_opt, write_json_atomic};
pub use json::JsonStore;
pub use ledger_data::{MonthEntry, UserLedger};
pub use memory::MemoryStore;

use crate::error::EnvelopeResult;
use crate::models::{
    EnvelopeBudget, EnvelopeClassId, Expense, ExpenseId, Money, Month, MonthId, Project,
    ProjectId, UserId,
};

/// One initialized month and the records filed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthActivity {
    pub month: Month,
    pub budgets: Vec<EnvelopeBudget>,
    pub expenses: Vec<Expense>,
}

/// Persistence operations the ledger needs
///
/// All calls are scoped to a single user. Reads of a user or month that has
/// no records return empty results rather than errors.
pub trait LedgerStore {
    /// Initialized months in creation order
    fn list_months(&self, user: &UserId) -> EnvelopeResult<Vec<Month>>;

    fn get_month(&self, user: &UserId, month: MonthId) -> EnvelopeResult<Option<Month>>;

    /// Create the month record if absent; returns the (possibly existing) record
    fn create_month(&self, user: &UserId, month: MonthId) -> EnvelopeResult<Month>;

    fn list_envelope_budgets(
        &self,
        user: &UserId,
        month: MonthId,
    ) -> EnvelopeResult<Vec<EnvelopeBudget>>;

    /// Insert or overwrite the budget for its class; returns the previous value
    fn upsert_envelope_budget(
        &self,
        user: &UserId,
        month: MonthId,
        budget: EnvelopeBudget,
    ) -> EnvelopeResult<Option<EnvelopeBudget>>;

    /// Expenses newest first, optionally only those of one class
    fn list_expenses(
        &self,
        user: &UserId,
        month: MonthId,
        class_filter: Option<&EnvelopeClassId>,
    ) -> EnvelopeResult<Vec<Expense>>;

    fn get_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
    ) -> EnvelopeResult<Option<Expense>>;

    fn insert_expense(&self, user: &UserId, month: MonthId, expense: Expense)
        -> EnvelopeResult<()>;

    /// Replace a stored expense with the same id; returns the previous value
    fn replace_expense(
        &self,
        user: &UserId,
        month: MonthId,
        expense: Expense,
    ) -> EnvelopeResult<Expense>;

    /// Remove an expense; returns it if it existed
    fn remove_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
    ) -> EnvelopeResult<Option<Expense>>;

    /// Projects in the order they were planned
    fn list_projects(&self, user: &UserId) -> EnvelopeResult<Vec<Project>>;

    fn get_project(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Option<Project>>;

    fn insert_project(&self, user: &UserId, project: Project) -> EnvelopeResult<()>;

    /// Replace a stored project with the same id; returns the previous value
    fn replace_project(&self, user: &UserId, project: Project) -> EnvelopeResult<Project>;

    /// Remove a project; returns it if it existed
    fn remove_project(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Option<Project>>;

    /// Running total of manual injections into the project budget
    fn manual_injection(&self, user: &UserId) -> EnvelopeResult<Money>;

    /// Add to the manual injection; returns the new total
    fn add_manual_injection(&self, user: &UserId, amount: Money) -> EnvelopeResult<Money>;

    /// Counter that changes whenever the user's records change
    fn revision(&self, user: &UserId) -> EnvelopeResult<u64>;

    /// Every initialized month with its budgets and expenses, in creation order
    fn load_history(&self, user: &UserId) -> EnvelopeResult<Vec<MonthActivity>> {
        self.list_months(user)?
            .into_iter()
            .map(|month| {
                let budgets = self.list_envelope_budgets(user, month.id)?;
                let expenses = self.list_expenses(user, month.id, None)?;
                Ok(MonthActivity {
                    month,
                    budgets,
                    expenses,
                })
            })
            .collect()
    }
}
