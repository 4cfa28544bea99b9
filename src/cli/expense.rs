//! Expense CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{EnvelopeClassId, ExpensePatch, MonthId, NewExpense, UserId};
use crate::services::LedgerContext;

use super::{parse_amount, parse_date, parse_month};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Envelope class (e.g., "groceries")
        class: String,
        /// Amount (e.g., "350" or "350.50")
        amount: String,
        /// Expense date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Month to file under; defaults to the month of the date
        #[arg(short, long)]
        month: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Edit an expense
    Edit {
        /// Expense ID (full or short form)
        id: String,
        /// Month the expense is filed under; defaults to current
        #[arg(short, long)]
        month: Option<String>,
        /// New envelope class
        #[arg(short, long)]
        class: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New note (empty to clear)
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID (full or short form)
        id: String,
        /// Month the expense is filed under; defaults to current
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show expense details
    Show {
        /// Expense ID (full or short form)
        id: String,
        /// Month the expense is filed under; defaults to current
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List the expenses of a month
    List {
        /// Month; defaults to current
        #[arg(short, long)]
        month: Option<String>,
        /// Only this envelope class
        #[arg(short, long)]
        class: Option<String>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    context: &LedgerContext,
    settings: &Settings,
    user: &UserId,
    cmd: ExpenseCommands,
) -> EnvelopeResult<()> {
    let expenses = context.expenses();
    let catalog = context.catalog();
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            class,
            amount,
            date,
            month,
            note,
        } => {
            let amount = parse_amount(&amount)?;
            let (month, date) = match (month, date) {
                (Some(month), Some(date)) => (parse_month(Some(month.as_str()))?, parse_date(&date)?),
                (None, Some(date)) => {
                    let date = parse_date(&date)?;
                    (MonthId::from_date(date), date)
                }
                (month, None) => {
                    let month = parse_month(month.as_deref())?;
                    let today = Local::now().date_naive();
                    let date = if month.contains(today) {
                        today
                    } else {
                        month.first_day()
                    };
                    (month, date)
                }
            };
            if !month.contains(date) {
                log::warn!("Expense dated {} is filed under {}", date, month);
            }

            let mut new = NewExpense::new(EnvelopeClassId::new(class.trim()), amount, date);
            if let Some(note) = note {
                new = new.with_note(note);
            }
            new.validate()
                .map_err(|e| EnvelopeError::Validation(e.to_string()))?;

            let expense = expenses.add_expense(user, month, new)?;
            println!("Recorded expense {} in {}", expense.id.short(), month.label());
            print!("{}", format_expense_details(&expense, catalog, currency));
        }

        ExpenseCommands::Edit {
            id,
            month,
            class,
            amount,
            date,
            note,
        } => {
            let month = parse_month(month.as_deref())?;
            let expense = expenses.find_expense(user, month, &id)?;

            let patch = ExpensePatch {
                class_id: class.map(|c| EnvelopeClassId::new(c.trim())),
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                note,
            };
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            patch
                .validate()
                .map_err(|e| EnvelopeError::Validation(e.to_string()))?;

            let updated = expenses.update_expense(user, month, expense.id, patch)?;
            println!("Updated expense {}", updated.id.short());
            print!("{}", format_expense_details(&updated, catalog, currency));
        }

        ExpenseCommands::Delete { id, month } => {
            let month = parse_month(month.as_deref())?;
            let expense = expenses.find_expense(user, month, &id)?;
            let deleted = expenses.delete_expense(user, month, expense.id)?;
            println!(
                "Deleted expense {} ({})",
                deleted.id.short(),
                deleted.amount.format_with_currency(currency)
            );
        }

        ExpenseCommands::Show { id, month } => {
            let month = parse_month(month.as_deref())?;
            let expense = expenses.find_expense(user, month, &id)?;
            print!("{}", format_expense_details(&expense, catalog, currency));
        }

        ExpenseCommands::List { month, class } => {
            let month = parse_month(month.as_deref())?;
            let class_id = class.map(|c| EnvelopeClassId::new(c.trim()));
            let list = expenses.list_expenses(user, month, class_id.as_ref())?;
            println!("Expenses for {}:", month.label());
            println!("{}", format_expense_list(&list, catalog, currency));
        }
    }

    Ok(())
}
