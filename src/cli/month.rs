//! Month CLI commands
//!
//! Month initialization, carrying budgets forward and listing months.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_month_list, format_plan};
use crate::error::EnvelopeResult;
use crate::models::{BudgetPlan, MonthId, UserId};
use crate::services::LedgerContext;

use super::{parse_amount, parse_assignment, parse_month};

/// Month subcommands
#[derive(Subcommand)]
pub enum MonthCommands {
    /// Set the envelope budgets of a month
    Init {
        /// Month (e.g., "2024-01", "current", "next"); defaults to current
        month: Option<String>,
        /// Budget for one envelope (e.g., "groceries=300"); repeatable
        #[arg(short, long = "set", value_name = "CLASS=AMOUNT")]
        set: Vec<String>,
        /// Display name for one envelope this month (e.g., "groceries=Food")
        #[arg(short, long = "name", value_name = "CLASS=LABEL")]
        name: Vec<String>,
        /// Start from the previous month's budgets
        #[arg(short, long)]
        carry_forward: bool,
    },

    /// Show the previous month's budgets as a starting plan
    CarryForward {
        /// Target month; defaults to current
        month: Option<String>,
        /// Initialize the month with the plan
        #[arg(long)]
        apply: bool,
    },

    /// Show the budgets of a month
    Show {
        /// Month; defaults to current
        month: Option<String>,
    },

    /// List initialized months
    List,
}

/// Handle a month command
pub fn handle_month_command(
    context: &LedgerContext,
    settings: &Settings,
    user: &UserId,
    cmd: MonthCommands,
) -> EnvelopeResult<()> {
    let months = context.months();
    let currency = settings.currency_symbol.as_str();

    match cmd {
        MonthCommands::Init {
            month,
            set,
            name,
            carry_forward,
        } => {
            let month = parse_month(month.as_deref())?;

            let mut plan = if carry_forward {
                starting_plan(context, user, month)?
            } else {
                BudgetPlan::new()
            };
            for arg in &set {
                let (class_id, value) = parse_assignment(arg)?;
                plan.set_amount(class_id, parse_amount(value)?);
            }
            for arg in &name {
                let (class_id, label) = parse_assignment(arg)?;
                plan.set_display_name(class_id, label.to_string());
            }

            months.initialize_month(user, month, &plan)?;
            println!("Initialized {}:", month.label());
            print!("{}", format_plan(&plan, context.catalog(), currency));
        }

        MonthCommands::CarryForward { month, apply } => {
            let month = parse_month(month.as_deref())?;
            match months.carry_forward_from_previous_month(user, month)? {
                Some(plan) => {
                    println!("Budgets from {}:", month.prev().label());
                    print!("{}", format_plan(&plan, context.catalog(), currency));
                    if apply {
                        months.initialize_month(user, month, &plan)?;
                        println!();
                        println!("Initialized {} with these budgets.", month.label());
                    }
                }
                None => {
                    println!("No budgets in {} to carry forward.", month.prev().label());
                }
            }
        }

        MonthCommands::Show { month } => {
            let month = parse_month(month.as_deref())?;
            let plan = months.budgets(user, month)?;
            println!("Budgets for {}:", month.label());
            print!("{}", format_plan(&plan, context.catalog(), currency));
        }

        MonthCommands::List => {
            println!("{}", format_month_list(&months.list_months(user)?));
        }
    }

    Ok(())
}

fn starting_plan(context: &LedgerContext, user: &UserId, month: MonthId) -> EnvelopeResult<BudgetPlan> {
    match context.months().carry_forward_from_previous_month(user, month)? {
        Some(plan) => Ok(plan),
        None => {
            println!(
                "No budgets in {} to carry forward; starting from zero.",
                month.prev().label()
            );
            Ok(BudgetPlan::new())
        }
    }
}
