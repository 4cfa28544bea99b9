//! JSON file ledger store
//!
//! Each user's ledger lives in `<users_dir>/<user>.json`. Files are loaded
//! lazily on first access and rewritten whole after every change.

use std::path::PathBuf;

use crate::error::EnvelopeResult;
use crate::models::{
    EnvelopeBudget, EnvelopeClassId, Expense, ExpenseId, Money, Month, MonthId, Project,
    ProjectId, UserId,
};

use super::file_io::{read_json, write_json_atomic};
use super::{LedgerStore, MemoryStore, MonthActivity, UserLedger};

/// Ledger store backed by one JSON document per user
pub struct JsonStore {
    users_dir: PathBuf,
    loaded: MemoryStore,
}

impl JsonStore {
    pub fn new(users_dir: PathBuf) -> Self {
        Self {
            users_dir,
            loaded: MemoryStore::new(),
        }
    }

    /// Path of a user's ledger file
    pub fn user_file(&self, user: &UserId) -> PathBuf {
        self.users_dir.join(format!("{}.json", user))
    }

    fn ensure_loaded(&self, user: &UserId) -> EnvelopeResult<()> {
        if self.loaded.holds(user)? {
            return Ok(());
        }
        let path = self.user_file(user);
        let ledger: UserLedger = read_json(&path)?;
        log::debug!(
            "Loaded ledger for {} from {} (revision {})",
            user,
            path.display(),
            ledger.revision
        );
        self.loaded.install(user, ledger)
    }

    fn persist(&self, user: &UserId) -> EnvelopeResult<()> {
        let ledger = self.loaded.snapshot(user)?;
        write_json_atomic(self.user_file(user), &ledger)
    }

    /// Apply a write to the in-memory copy, then persist it if the revision moved
    fn mutate<T>(&self, user: &UserId, f: impl FnOnce(&MemoryStore) -> EnvelopeResult<T>) -> EnvelopeResult<T> {
        self.ensure_loaded(user)?;
        let before = self.loaded.revision(user)?;
        let result = f(&self.loaded)?;
        if self.loaded.revision(user)? != before {
            self.persist(user)?;
        }
        Ok(result)
    }

    fn query<T>(&self, user: &UserId, f: impl FnOnce(&MemoryStore) -> EnvelopeResult<T>) -> EnvelopeResult<T> {
        self.ensure_loaded(user)?;
        f(&self.loaded)
    }
}

impl LedgerStore for JsonStore {
    fn list_months(&self, user: &UserId) -> EnvelopeResult<Vec<Month>> {
        self.query(user, |s| s.list_months(user))
    }

    fn get_month(&self, user: &UserId, month: MonthId) -> EnvelopeResult<Option<Month>> {
        self.query(user, |s| s.get_month(user, month))
    }

    fn create_month(&self, user: &UserId, month: MonthId) -> EnvelopeResult<Month> {
        self.mutate(user, |s| s.create_month(user, month))
    }

    fn list_envelope_budgets(
        &self,
        user: &UserId,
        month: MonthId,
    ) -> EnvelopeResult<Vec<EnvelopeBudget>> {
        self.query(user, |s| s.list_envelope_budgets(user, month))
    }

    fn upsert_envelope_budget(
        &self,
        user: &UserId,
        month: MonthId,
        budget: EnvelopeBudget,
    ) -> EnvelopeResult<Option<EnvelopeBudget>> {
        self.mutate(user, |s| s.upsert_envelope_budget(user, month, budget))
    }

    fn list_expenses(
        &self,
        user: &UserId,
        month: MonthId,
        class_filter: Option<&EnvelopeClassId>,
    ) -> EnvelopeResult<Vec<Expense>> {
        self.query(user, |s| s.list_expenses(user, month, class_filter))
    }

    fn get_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
    ) -> EnvelopeResult<Option<Expense>> {
        self.query(user, |s| s.get_expense(user, month, id))
    }

    fn insert_expense(
        &self,
        user: &UserId,
        month: MonthId,
        expense: Expense,
    ) -> EnvelopeResult<()> {
        self.mutate(user, |s| s.insert_expense(user, month, expense))
    }

    fn replace_expense(
        &self,
        user: &UserId,
        month: MonthId,
        expense: Expense,
    ) -> EnvelopeResult<Expense> {
        self.mutate(user, |s| s.replace_expense(user, month, expense))
    }

    fn remove_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
    ) -> EnvelopeResult<Option<Expense>> {
        self.mutate(user, |s| s.remove_expense(user, month, id))
    }

    fn list_projects(&self, user: &UserId) -> EnvelopeResult<Vec<Project>> {
        self.query(user, |s| s.list_projects(user))
    }

    fn get_project(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Option<Project>> {
        self.query(user, |s| s.get_project(user, id))
    }

    fn insert_project(&self, user: &UserId, project: Project) -> EnvelopeResult<()> {
        self.mutate(user, |s| s.insert_project(user, project))
    }

    fn replace_project(&self, user: &UserId, project: Project) -> EnvelopeResult<Project> {
        self.mutate(user, |s| s.replace_project(user, project))
    }

    fn remove_project(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Option<Project>> {
        self.mutate(user, |s| s.remove_project(user, id))
    }

    fn manual_injection(&self, user: &UserId) -> EnvelopeResult<Money> {
        self.query(user, |s| s.manual_injection(user))
    }

    fn add_manual_injection(&self, user: &UserId, amount: Money) -> EnvelopeResult<Money> {
        self.mutate(user, |s| s.add_manual_injection(user, amount))
    }

    fn revision(&self, user: &UserId) -> EnvelopeResult<u64> {
        self.query(user, |s| s.revision(user))
    }

    fn load_history(&self, user: &UserId) -> EnvelopeResult<Vec<MonthActivity>> {
        self.query(user, |s| s.load_history(user))
    }
}
