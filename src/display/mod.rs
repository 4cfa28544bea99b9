//! Display formatting for terminal output

pub mod envelope;
pub mod expense;
pub mod project;

pub use envelope::{format_month_list, format_plan, format_savings, format_snapshot};
pub use expense::{format_audit_entries, format_expense_details, format_expense_list};
pub use project::{format_project_budget, format_project_details, format_project_list};
