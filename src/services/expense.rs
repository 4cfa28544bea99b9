//! Expense service
//!
//! Create, edit, delete and list the expenses filed under a month. Recording
//! an expense does not create the month: expenses are filed under whatever
//! month id the caller gives.

use std::str::FromStr;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{EnvelopeClassId, Expense, ExpenseId, ExpensePatch, MonthId, NewExpense, UserId};

use super::LedgerContext;

/// Service for expense management
pub struct ExpenseService<'a> {
    context: &'a LedgerContext,
}

impl<'a> ExpenseService<'a> {
    pub fn new(context: &'a LedgerContext) -> Self {
        Self { context }
    }

    fn check_class(&self, class_id: &EnvelopeClassId) -> EnvelopeResult<()> {
        if self.context.catalog().contains(class_id) {
            Ok(())
        } else {
            Err(EnvelopeError::Validation(format!(
                "Unknown envelope class '{}'",
                class_id
            )))
        }
    }

    fn describe(&self, expense: &Expense) -> String {
        format!(
            "{} {} {}",
            expense.date,
            self.context.catalog().display_name(&expense.class_id, None),
            expense.amount
        )
    }

    /// Record a new expense
    pub fn add_expense(
        &self,
        user: &UserId,
        month: MonthId,
        new: NewExpense,
    ) -> EnvelopeResult<Expense> {
        self.check_class(&new.class_id)?;

        let expense = Expense::from_new(new);
        self.context
            .store()
            .insert_expense(user, month, expense.clone())?;

        log::info!("Recorded expense {} for {} in {}", expense.id.short(), user, month);
        self.context.record(&[AuditEntry::create(
            user,
            month,
            EntityType::Expense,
            expense.id.to_string(),
            &expense,
        )
        .with_name(self.describe(&expense))])?;

        Ok(expense)
    }

    /// Apply a partial update to an expense
    pub fn update_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> EnvelopeResult<Expense> {
        if let Some(class_id) = &patch.class_id {
            self.check_class(class_id)?;
        }

        let store = self.context.store();
        let mut expense = store
            .get_expense(user, month, id)?
            .ok_or_else(|| EnvelopeError::expense_not_found(id.to_string()))?;
        let before = expense.clone();

        expense.apply(patch);
        store.replace_expense(user, month, expense.clone())?;

        log::info!("Updated expense {} for {} in {}", id.short(), user, month);
        let entry = AuditEntry::update(
            user,
            month,
            EntityType::Expense,
            id.to_string(),
            &before,
            &expense,
        );
        if !entry.is_noop() {
            self.context
                .record(&[entry.with_name(self.describe(&expense))])?;
        }

        Ok(expense)
    }

    /// Delete an expense, returning it
    pub fn delete_expense(
        &self,
        user: &UserId,
        month: MonthId,
        id: ExpenseId,
    ) -> EnvelopeResult<Expense> {
        let expense = self
            .context
            .store()
            .remove_expense(user, month, id)?
            .ok_or_else(|| EnvelopeError::expense_not_found(id.to_string()))?;

        log::info!("Deleted expense {} for {} in {}", id.short(), user, month);
        self.context.record(&[AuditEntry::delete(
            user,
            month,
            EntityType::Expense,
            id.to_string(),
            &expense,
        )
        .with_name(self.describe(&expense))])?;

        Ok(expense)
    }

    /// Expenses of a month, newest first
    pub fn list_expenses(
        &self,
        user: &UserId,
        month: MonthId,
        class_filter: Option<&EnvelopeClassId>,
    ) -> EnvelopeResult<Vec<Expense>> {
        self.context.store().list_expenses(user, month, class_filter)
    }

    /// Find an expense by full id or a unique prefix (`exp-1a2b3c4d`)
    pub fn find_expense(
        &self,
        user: &UserId,
        month: MonthId,
        reference: &str,
    ) -> EnvelopeResult<Expense> {
        if let Ok(id) = ExpenseId::from_str(reference.trim()) {
            if let Some(expense) = self.context.store().get_expense(user, month, id)? {
                return Ok(expense);
            }
        }

        let mut matches: Vec<Expense> = self
            .list_expenses(user, month, None)?
            .into_iter()
            .filter(|e| e.id.matches(reference))
            .collect();

        match matches.len() {
            0 => Err(EnvelopeError::expense_not_found(reference)),
            1 => Ok(matches.remove(0)),
            n => Err(EnvelopeError::Validation(format!(
                "'{}' matches {} expenses in {}; use a longer id",
                reference, n, month
            ))),
        }
    }
}
