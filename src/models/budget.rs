//! Envelope budget model
//!
//! An `EnvelopeBudget` is the amount allocated to one envelope class for one
//! month. A `BudgetPlan` is the set of amounts and display-name overrides a
//! user submits when initializing (or re-initializing) a month.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::catalog::EnvelopeCatalog;
use super::ids::EnvelopeClassId;
use super::money::Money;

/// The initial allocation of one envelope class for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeBudget {
    /// The class this budget is for
    pub class_id: EnvelopeClassId,

    /// Amount allocated at month initialization
    pub initial: Money,

    /// Optional user-chosen name shown instead of the catalog label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl EnvelopeBudget {
    pub fn new(class_id: EnvelopeClassId, initial: Money) -> Self {
        Self {
            class_id,
            initial,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.initial.is_negative() {
            return Err(BudgetValidationError::NegativeBudget(self.class_id.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for EnvelopeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class_id, self.initial)
    }
}

/// Amounts and display names for initializing a month
///
/// Classes without an amount are budgeted at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPlan {
    #[serde(default)]
    amounts: BTreeMap<EnvelopeClassId, Money>,
    #[serde(default)]
    display_names: BTreeMap<EnvelopeClassId, String>,
}

impl BudgetPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style amount setter
    pub fn with_amount(mut self, class_id: impl Into<EnvelopeClassId>, amount: Money) -> Self {
        self.set_amount(class_id.into(), amount);
        self
    }

    /// Builder-style display-name setter
    pub fn with_display_name(
        mut self,
        class_id: impl Into<EnvelopeClassId>,
        name: impl Into<String>,
    ) -> Self {
        self.set_display_name(class_id.into(), name.into());
        self
    }

    pub fn set_amount(&mut self, class_id: EnvelopeClassId, amount: Money) {
        self.amounts.insert(class_id, amount);
    }

    /// Set a display name; a blank name removes the override
    pub fn set_display_name(&mut self, class_id: EnvelopeClassId, name: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            self.display_names.remove(&class_id);
        } else {
            self.display_names.insert(class_id, name);
        }
    }

    /// Amount for a class, zero if unspecified
    pub fn amount(&self, class_id: &EnvelopeClassId) -> Money {
        self.amounts.get(class_id).copied().unwrap_or_default()
    }

    pub fn display_name(&self, class_id: &EnvelopeClassId) -> Option<&str> {
        self.display_names.get(class_id).map(String::as_str)
    }

    pub fn amounts(&self) -> &BTreeMap<EnvelopeClassId, Money> {
        &self.amounts
    }

    pub fn display_names(&self) -> &BTreeMap<EnvelopeClassId, String> {
        &self.display_names
    }

    /// Sum of every specified amount
    pub fn total(&self) -> Money {
        self.amounts.values().sum()
    }

    /// Build a plan from stored budgets (the inverse of initialization)
    pub fn from_budgets<'a>(budgets: impl IntoIterator<Item = &'a EnvelopeBudget>) -> Self {
        let mut plan = Self::new();
        for budget in budgets {
            plan.set_amount(budget.class_id.clone(), budget.initial);
            if let Some(name) = &budget.display_name {
                plan.set_display_name(budget.class_id.clone(), name.clone());
            }
        }
        plan
    }

    /// Check every class named by the plan exists and no amount is negative
    pub fn validate(&self, catalog: &EnvelopeCatalog) -> Result<(), BudgetValidationError> {
        let named = self.amounts.keys().chain(self.display_names.keys());
        for class_id in named {
            if !catalog.contains(class_id) {
                return Err(BudgetValidationError::UnknownClass(class_id.clone()));
            }
        }
        for (class_id, amount) in &self.amounts {
            if amount.is_negative() {
                return Err(BudgetValidationError::NegativeBudget(class_id.clone()));
            }
        }
        Ok(())
    }

    /// One budget per catalog class, in catalog order
    pub fn budgets_for(&self, catalog: &EnvelopeCatalog) -> Vec<EnvelopeBudget> {
        catalog
            .class_ids()
            .map(|id| {
                EnvelopeBudget::new(id.clone(), self.amount(id))
                    .with_display_name(self.display_name(id).map(str::to_string))
            })
            .collect()
    }
}

/// Validation errors for budgets and plans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeBudget(EnvelopeClassId),
    UnknownClass(EnvelopeClassId),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeBudget(id) => write!(f, "Budget for '{}' cannot be negative", id),
            Self::UnknownClass(id) => write!(f, "Unknown envelope class '{}'", id),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
