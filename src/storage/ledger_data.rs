//! Per-user ledger document
//!
//! `UserLedger` is everything one user owns: their months, each month's
//! envelope budgets and expenses, their savings projects and the running
//! manual injection. Both bundled stores keep one of these per user; the
//! JSON store writes it to disk as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{
    EnvelopeBudget, EnvelopeClassId, Expense, ExpenseId, Money, Month, MonthId, Project,
    ProjectId,
};

use super::MonthActivity;

/// Records filed under one month id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthEntry {
    /// Present once the month has been initialized. Expenses can be filed
    /// under a month id that was never initialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,

    #[serde(default)]
    pub budgets: Vec<EnvelopeBudget>,

    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// All records owned by one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLedger {
    /// Incremented on every write
    #[serde(default)]
    pub revision: u64,

    /// Creation sequence handed to the next new month
    #[serde(default)]
    pub next_sequence: u64,

    #[serde(default)]
    pub months: BTreeMap<MonthId, MonthEntry>,

    #[serde(default)]
    pub projects: Vec<Project>,

    /// Money added to the project budget outside the envelopes
    #[serde(default)]
    pub manual_injection: Money,
}

impl UserLedger {
    /// Initialized months in creation order
    pub fn months(&self) -> Vec<Month> {
        let mut months: Vec<Month> = self
            .months
            .values()
            .filter_map(|entry| entry.month.clone())
            .collect();
        months.sort_by_key(|m| m.sequence);
        months
    }

    pub fn month(&self, id: MonthId) -> Option<&Month> {
        self.months.get(&id).and_then(|entry| entry.month.as_ref())
    }

    /// Create the month record if absent; returns the record and whether it
    /// was created by this call
    pub fn create_month(&mut self, id: MonthId) -> (Month, bool) {
        let next_sequence = self.next_sequence;
        let entry = self.months.entry(id).or_default();
        if let Some(existing) = &entry.month {
            return (existing.clone(), false);
        }
        let month = Month::new(id, next_sequence);
        entry.month = Some(month.clone());
        self.next_sequence += 1;
        (month, true)
    }

    pub fn budgets(&self, id: MonthId) -> Vec<EnvelopeBudget> {
        self.months
            .get(&id)
            .map(|entry| entry.budgets.clone())
            .unwrap_or_default()
    }

    /// Insert or overwrite the budget for the budget's class; returns the
    /// previous value
    pub fn upsert_budget(&mut self, id: MonthId, budget: EnvelopeBudget) -> Option<EnvelopeBudget> {
        let budgets = &mut self.months.entry(id).or_default().budgets;
        match budgets.iter_mut().find(|b| b.class_id == budget.class_id) {
            Some(slot) => Some(std::mem::replace(slot, budget)),
            None => {
                budgets.push(budget);
                None
            }
        }
    }

    /// Expenses of a month, newest first, optionally restricted to one class
    pub fn expenses(&self, id: MonthId, class_filter: Option<&EnvelopeClassId>) -> Vec<Expense> {
        let mut expenses: Vec<Expense> = self
            .months
            .get(&id)
            .map(|entry| {
                entry
                    .expenses
                    .iter()
                    .filter(|e| class_filter.map_or(true, |c| &e.class_id == c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        expenses
    }

    pub fn expense(&self, id: MonthId, expense_id: ExpenseId) -> Option<&Expense> {
        self.months
            .get(&id)
            .and_then(|entry| entry.expenses.iter().find(|e| e.id == expense_id))
    }

    pub fn insert_expense(&mut self, id: MonthId, expense: Expense) -> EnvelopeResult<()> {
        let expenses = &mut self.months.entry(id).or_default().expenses;
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(EnvelopeError::Storage(format!(
                "expense {} already exists in {}",
                expense.id, id
            )));
        }
        expenses.push(expense);
        Ok(())
    }

    /// Replace a stored expense by id; returns the previous value
    pub fn replace_expense(&mut self, id: MonthId, expense: Expense) -> EnvelopeResult<Expense> {
        let slot = self
            .months
            .get_mut(&id)
            .and_then(|entry| entry.expenses.iter_mut().find(|e| e.id == expense.id))
            .ok_or_else(|| EnvelopeError::expense_not_found(expense.id.to_string()))?;
        Ok(std::mem::replace(slot, expense))
    }

    pub fn remove_expense(&mut self, id: MonthId, expense_id: ExpenseId) -> Option<Expense> {
        let entry = self.months.get_mut(&id)?;
        let position = entry.expenses.iter().position(|e| e.id == expense_id)?;
        Some(entry.expenses.remove(position))
    }

    /// Projects in the order they were planned
    pub fn projects(&self) -> Vec<Project> {
        let mut projects = self.projects.clone();
        projects.sort_by_key(|p| p.created_at);
        projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn insert_project(&mut self, project: Project) -> EnvelopeResult<()> {
        if self.project(project.id).is_some() {
            return Err(EnvelopeError::Storage(format!(
                "project {} already exists",
                project.id
            )));
        }
        self.projects.push(project);
        Ok(())
    }

    /// Replace a stored project by id; returns the previous value
    pub fn replace_project(&mut self, project: Project) -> EnvelopeResult<Project> {
        let slot = self
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| EnvelopeError::project_not_found(project.id.to_string()))?;
        Ok(std::mem::replace(slot, project))
    }

    pub fn remove_project(&mut self, id: ProjectId) -> Option<Project> {
        let position = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(position))
    }

    /// Add to the manual injection; returns the new total
    pub fn add_manual_injection(&mut self, amount: Money) -> Money {
        self.manual_injection += amount;
        self.manual_injection
    }

    /// Every initialized month with its records, in creation order
    pub fn history(&self) -> Vec<MonthActivity> {
        self.months()
            .into_iter()
            .map(|month| MonthActivity {
                budgets: self.budgets(month.id),
                expenses: self.expenses(month.id, None),
                month,
            })
            .collect()
    }
}
