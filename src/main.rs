use anyhow::Result;
use clap::{Parser, Subcommand};

use envelope_ledger::cli::{
    handle_expense_command, handle_month_command, handle_project_command, show_history,
    show_savings, show_status,
};
use envelope_ledger::config::{paths::LedgerPaths, settings::Settings};
use envelope_ledger::models::UserId;
use envelope_ledger::services::LedgerContext;

#[derive(Parser)]
#[command(
    name = "envledger",
    author = "Kaylee Beyene",
    version,
    about = "Cumulative envelope budgeting ledger",
    long_about = "envledger splits each month's budget across a fixed set of envelopes, \
                  carries unspent money into the next month and covers any overspend \
                  out of the savings envelope."
)]
struct Cli {
    /// Ledger owner
    #[arg(short, long, global = true, env = "ENVELOPE_LEDGER_USER", default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Month initialization and budgets
    #[command(subcommand)]
    Month(envelope_ledger::cli::MonthCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(envelope_ledger::cli::ExpenseCommands),

    /// Savings projects and manual injections
    #[command(subcommand, alias = "prj")]
    Project(envelope_ledger::cli::ProjectCommands),

    /// Show the envelopes of a month with carry-over applied
    Status {
        /// Month (e.g., "2024-01", "current", "last"); defaults to current
        month: Option<String>,
    },

    /// Show realized and potential savings
    Savings {
        /// Month to report as of; defaults to current
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
        /// Include every user's changes
        #[arg(long)]
        all_users: bool,
    },

    /// Show configuration and paths, or change a setting
    Config {
        /// Setting to change (currency_symbol, month_ordering, cache_snapshots, audit_enabled)
        key: Option<String>,
        /// New value
        value: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let user = UserId::parse(&cli.user)?;

    match cli.command {
        Some(Commands::Config { key, value }) => match (key, value) {
            (Some(key), Some(value)) => {
                settings.set(&key, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", key, value);
            }
            (Some(key), None) => {
                anyhow::bail!("Missing value for setting '{}'", key);
            }
            _ => print_config(&paths, &settings),
        },
        Some(Commands::Month(cmd)) => {
            let context = LedgerContext::open(&paths, &settings)?;
            handle_month_command(&context, &settings, &user, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            let context = LedgerContext::open(&paths, &settings)?;
            handle_expense_command(&context, &settings, &user, cmd)?;
        }
        Some(Commands::Project(cmd)) => {
            let context = LedgerContext::open(&paths, &settings)?;
            handle_project_command(&context, &settings, &user, cmd)?;
        }
        Some(Commands::Status { month }) => {
            let context = LedgerContext::open(&paths, &settings)?;
            show_status(&context, &settings, &user, month.as_deref())?;
        }
        Some(Commands::Savings { as_of }) => {
            let context = LedgerContext::open(&paths, &settings)?;
            show_savings(&context, &settings, &user, as_of.as_deref())?;
        }
        Some(Commands::History { count, all_users }) => {
            let context = LedgerContext::open(&paths, &settings)?;
            show_history(&context, &user, count, all_users)?;
        }
        None => {
            println!("envledger - cumulative envelope budgeting");
            println!();
            println!("Run 'envledger --help' for usage information.");
            println!("Run 'envledger month init --set rent=1000' to set up this month.");
        }
    }

    Ok(())
}

fn print_config(paths: &LedgerPaths, settings: &Settings) {
    println!("envledger Configuration");
    println!("=======================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("User data:      {}", paths.users_dir().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!("Audit log:      {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  currency_symbol: {}", settings.currency_symbol);
    println!("  month_ordering:  {}", settings.month_ordering);
    println!("  cache_snapshots: {}", settings.cache_snapshots);
    println!("  audit_enabled:   {}", settings.audit_enabled);
    println!();
    println!("Envelopes:");
    for class in settings.catalog.classes() {
        let marker = if settings.catalog.is_savings(&class.id) {
            " (savings)"
        } else {
            ""
        };
        println!("  {:<16} {}{}", class.id, class.label, marker);
    }
}
