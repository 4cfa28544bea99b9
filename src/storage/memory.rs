//! In-memory ledger store

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{
    EnvelopeBudget, EnvelopeClassId, Expense, ExpenseId, Money, Month, MonthId, Project,
    ProjectId, UserId,
};

use super::{LedgerStore, MonthActivity, UserLedger};

/// Ledger store holding every user's records in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledgers: RwLock<HashMap<UserId, UserLedger>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a user's ledger; unknown users read as empty
    pub(crate) fn read<T>(&self, user: &UserId, f: impl FnOnce(&UserLedger) -> T) -> EnvelopeResult<T> {
        let ledgers = self
            .ledgers
            .read()
            .map_err(|e| EnvelopeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let empty = UserLedger::default();
        Ok(f(ledgers.get(user).unwrap_or(&empty)))
    }

    /// Run `f` against a user's ledger, bumping its revision when `f` succeeds
    pub(crate) fn write<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut UserLedger) -> EnvelopeResult<T>,
    ) -> EnvelopeResult<T> {
        let mut ledgers = self
            .ledgers
            .write()
            .map_err(|e| EnvelopeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ledger = ledgers.entry(user.clone()).or_default();
        let result = f(ledger)?;
        ledger.revision += 1;
        Ok(result)
    }

    /// Install a whole ledger for a user, replacing anything held
    pub(crate) fn install(&self, user: &UserId, ledger: UserLedger) -> EnvelopeResult<()> {
        let mut ledgers = self
            .ledgers
            .write()
            .map_err(|e| EnvelopeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        ledgers.insert(user.clone(), ledger);
        Ok(())
    }

    pub(crate) fn holds(&self, user: &UserId) -> EnvelopeResult<bool> {
        let ledgers = self
            .ledgers
            .read()
            .map_err(|e| EnvelopeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(ledgers.contains_key(user))
    }

    /// Copy of a user's whole ledger
    pub fn snapshot(&self, user: &UserId) -> EnvelopeResult<UserLedger> {
        self.read(user, UserLedger::clone)
    }
}

impl LedgerStore for MemoryStore {
    fn list_months(&self, user: &UserId) -> EnvelopeResult<Vec<Month>> {
        self.read(user, |l| l.months())
    }

    fn get_month(&self, user: &UserId, month: MonthId) -> EnvelopeResult<Option<Month>> {
        self.read(user, |l| l.month(month).cloned())
    }

    fn create_month(&self, user: &UserId, month: MonthId) -> EnvelopeResult<Month> {
        if let Some(existing) = self.get_month(user, month)? {
            return Ok(existing);
        }
        self.write(user, |l| Ok(l.create_month(month).0))
    }

    fn list_envelope_budgets(
        &self,
        user: &UserId,
        month: MonthId,
    ) -> EnvelopeResult<Vec<EnvelopeBudget>> {
        self.read(user, |l| l.budgets(month))
    }

    fn upsert_envelope_budget(
        &self,
        user: &UserId,
        month: MonthId,
        budget: EnvelopeBudget,
    ) -> EnvelopeResult<Option<EnvelopeBudget>> {
        self.write(user, |l| Ok(l.upsert_budget(month, budget)))
    }

    fn list_expenses(
        &self,
        user: &UserId,
        month: MonthId,
        class_filter: Option<&EnvelopeClassId>,
    ) -> EnvelopeResult<Vec<Expense>> {
        self.read(user, |l| l.expenses(month, class_filter))
    }

    fn get_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
    ) -> EnvelopeResult<Option<Expense>> {
        self.read(user, |l| l.expense(month, id).cloned())
    }

    fn insert_expense(
        &self,
        user: &UserId,
        month: MonthId,
        expense: Expense,
    ) -> EnvelopeResult<()> {
        self.write(user, |l| l.insert_expense(month, expense))
    }

    fn replace_expense(
        &self,
        user: &UserId,
        month: MonthId,
        expense: Expense,
    ) -> EnvelopeResult<Expense> {
        self.write(user, |l| l.replace_expense(month, expense))
    }

    fn remove_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
    ) -> EnvelopeResult<Option<Expense>> {
        if self.get_expense(user, month, id)?.is_none() {
            return Ok(None);
        }
        self.write(user, |l| Ok(l.remove_expense(month, id)))
    }

    fn list_projects(&self, user: &UserId) -> EnvelopeResult<Vec<Project>> {
        self.read(user, |l| l.projects())
    }

    fn get_project(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Option<Project>> {
        self.read(user, |l| l.project(id).cloned())
    }

    fn insert_project(&self, user: &UserId, project: Project) -> EnvelopeResult<()> {
        self.write(user, |l| l.insert_project(project))
    }

    fn replace_project(&self, user: &UserId, project: Project) -> EnvelopeResult<Project> {
        self.write(user, |l| l.replace_project(project))
    }

    fn remove_project(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Option<Project>> {
        if self.get_project(user, id)?.is_none() {
            return Ok(None);
        }
        self.write(user, |l| Ok(l.remove_project(id)))
    }

    fn manual_injection(&self, user: &UserId) -> EnvelopeResult<Money> {
        self.read(user, |l| l.manual_injection)
    }

    fn add_manual_injection(&self, user: &UserId, amount: Money) -> EnvelopeResult<Money> {
        self.write(user, |l| Ok(l.add_manual_injection(amount)))
    }

    fn revision(&self, user: &UserId) -> EnvelopeResult<u64> {
        self.read(user, |l| l.revision)
    }

    fn load_history(&self, user: &UserId) -> EnvelopeResult<Vec<MonthActivity>> {
        // One lock for the whole history
        self.read(user, |l| l.history())
    }
}
