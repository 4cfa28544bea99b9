//! Project CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_project_budget, format_project_details, format_project_list};
use crate::error::EnvelopeResult;
use crate::models::{NewProject, ProjectPatch, ProjectPriority, UserId};
use crate::services::LedgerContext;

use super::{parse_amount, parse_date, parse_month};

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Plan a project paid from savings
    Add {
        /// Project title
        title: String,
        /// Cost (e.g., "900" or "899.99")
        amount: String,
        /// Target date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Priority: high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Edit a project
    Edit {
        /// Project ID (full or short form)
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New cost
        #[arg(short, long)]
        amount: Option<String>,
        /// New target date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New note (empty to clear)
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Mark a project completed, or pending again
    Toggle {
        /// Project ID (full or short form)
        id: String,
    },

    /// Delete a project
    Delete {
        /// Project ID (full or short form)
        id: String,
    },

    /// Show project details
    Show {
        /// Project ID (full or short form)
        id: String,
    },

    /// List projects, affordable ones first
    List {
        /// Month the budget is computed as of; defaults to current
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Add money to the project budget outside the envelopes
    Inject {
        /// Amount to add
        #[arg(default_value = "3000")]
        amount: String,
    },
}

/// Handle a project command
pub fn handle_project_command(
    context: &LedgerContext,
    settings: &Settings,
    user: &UserId,
    cmd: ProjectCommands,
) -> EnvelopeResult<()> {
    let projects = context.projects();
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ProjectCommands::Add {
            title,
            amount,
            date,
            priority,
            note,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => Local::now().date_naive(),
            };
            let priority: ProjectPriority = priority.parse()?;

            let mut new = NewProject::new(title, amount, date).with_priority(priority);
            if let Some(note) = note {
                new = new.with_note(note);
            }

            let project = projects.add_project(user, new)?;
            println!("Added project {}", project.id.short());
            print!("{}", format_project_details(&project, currency));
        }

        ProjectCommands::Edit {
            id,
            title,
            amount,
            date,
            priority,
            note,
        } => {
            let project = projects.find_project(user, &id)?;
            let patch = ProjectPatch {
                title,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                priority: priority.as_deref().map(str::parse::<ProjectPriority>).transpose()?,
                status: None,
                note,
            };
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let updated = projects.update_project(user, project.id, patch)?;
            println!("Updated project {}", updated.id.short());
            print!("{}", format_project_details(&updated, currency));
        }

        ProjectCommands::Toggle { id } => {
            let project = projects.find_project(user, &id)?;
            let toggled = projects.toggle_status(user, project.id)?;
            println!("Project {} is now {}", toggled.id.short(), toggled.status);
        }

        ProjectCommands::Delete { id } => {
            let project = projects.find_project(user, &id)?;
            let deleted = projects.delete_project(user, project.id)?;
            println!("Deleted project {} ({})", deleted.id.short(), deleted.title);
        }

        ProjectCommands::Show { id } => {
            let project = projects.find_project(user, &id)?;
            print!("{}", format_project_details(&project, currency));
        }

        ProjectCommands::List { as_of } => {
            let as_of = parse_month(as_of.as_deref())?;
            let (budget, ranked) = projects.ranked_projects_as_of(user, as_of)?;
            print!("{}", format_project_budget(&budget, currency));
            println!();
            println!("{}", format_project_list(&ranked));
        }

        ProjectCommands::Inject { amount } => {
            let amount = parse_amount(&amount)?;
            let total = projects.inject_savings(user, amount)?;
            println!(
                "Injected {} (total injected {})",
                amount.format_with_currency(currency),
                total.format_with_currency(currency)
            );
        }
    }

    Ok(())
}
