//! Core data models for the envelope ledger
//!
//! Months, envelope classes and budgets, expenses, the derived envelope
//! state the ledger computes from them, and savings projects.

pub mod budget;
pub mod catalog;
pub mod expense;
pub mod ids;
pub mod money;
pub mod month;
pub mod project;
pub mod state;

pub use budget::{BudgetPlan, EnvelopeBudget};
pub use catalog::{EnvelopeCatalog, EnvelopeClass};
pub use expense::{Expense, ExpensePatch, NewExpense};
pub use ids::{EnvelopeClassId, ExpenseId, ProjectId, UserId};
pub use money::Money;
pub use month::{Month, MonthId};
pub use project::{
    rank_projects, NewProject, Project, ProjectBudget, ProjectOutlook, ProjectPatch,
    ProjectPriority, ProjectStatus,
};
pub use state::{EnvelopeLine, EnvelopeSnapshot, EnvelopeState, EnvelopeStatus, SavingsTotals};
