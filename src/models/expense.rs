//! Expense model
//!
//! An expense is filed under a (user, month) and references its envelope
//! class by id. It nets against that month's budget for the class no matter
//! how the budget is later edited.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EnvelopeClassId, ExpenseId};
use super::money::Money;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// Envelope class this expense is charged to
    pub class_id: EnvelopeClassId,

    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Materialize a new expense with a fresh id
    pub fn from_new(new: NewExpense) -> Self {
        Self {
            id: ExpenseId::new(),
            class_id: new.class_id,
            amount: new.amount,
            date: new.date,
            note: normalize_note(new.note),
            created_at: Utc::now(),
        }
    }

    /// Overwrite the fields present in the patch, leaving the rest untouched
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(class_id) = patch.class_id {
            self.class_id = class_id;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(note) = patch.note {
            self.note = normalize_note(Some(note));
        }
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.class_id, self.amount)?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Input for recording an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub class_id: EnvelopeClassId,
    pub amount: Money,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl NewExpense {
    pub fn new(class_id: impl Into<EnvelopeClassId>, amount: Money, date: NaiveDate) -> Self {
        Self {
            class_id: class_id.into(),
            amount,
            date,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Business-rule check for callers: amounts must be strictly positive
    ///
    /// The ledger itself does not call this.
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_amount(self.amount)
    }
}

/// Partial update of an expense; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    pub class_id: Option<EnvelopeClassId>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    /// `Some("")` clears the note
    pub note: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.class_id.is_none() && self.amount.is_none() && self.date.is_none() && self.note.is_none()
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        match self.amount {
            Some(amount) => validate_amount(amount),
            None => Ok(()),
        }
    }
}

fn validate_amount(amount: Money) -> Result<(), ExpenseValidationError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(ExpenseValidationError::NonPositiveAmount(amount))
    }
}

/// Validation errors for expense input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
