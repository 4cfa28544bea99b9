//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod expense;
pub mod month;
pub mod project;
pub mod report;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use month::{handle_month_command, MonthCommands};
pub use project::{handle_project_command, ProjectCommands};
pub use report::{show_history, show_savings, show_status};

use chrono::NaiveDate;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{EnvelopeClassId, Money, MonthId};

/// Parse a month argument ("2024-01", "current", "last", "next")
///
/// `None` means the current month.
pub fn parse_month(arg: Option<&str>) -> EnvelopeResult<MonthId> {
    let current = MonthId::current();
    match arg.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("current") | Some("this") => Ok(current),
        Some("last") | Some("prev") | Some("previous") => Ok(current.prev()),
        Some("next") => Ok(current.next()),
        Some(s) => MonthId::parse(s).map_err(|e| EnvelopeError::Validation(e.to_string())),
    }
}

pub fn parse_amount(s: &str) -> EnvelopeResult<Money> {
    Money::parse(s).map_err(|e| EnvelopeError::Validation(e.to_string()))
}

pub fn parse_date(s: &str) -> EnvelopeResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        EnvelopeError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", s))
    })
}

/// Split a `class=value` argument
pub fn parse_assignment(s: &str) -> EnvelopeResult<(EnvelopeClassId, &str)> {
    match s.split_once('=') {
        Some((class, value)) if !class.trim().is_empty() => {
            Ok((EnvelopeClassId::new(class.trim()), value.trim()))
        }
        _ => Err(EnvelopeError::Validation(format!(
            "Expected CLASS=VALUE, got '{}'",
            s
        ))),
    }
}
