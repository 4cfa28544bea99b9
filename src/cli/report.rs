//! Reporting commands: envelope status, savings and change history

use crate::config::settings::Settings;
use crate::display::{format_audit_entries, format_savings, format_snapshot};
use crate::error::EnvelopeResult;
use crate::models::UserId;
use crate::services::LedgerContext;

use super::parse_month;

/// Print the envelope table of a month
pub fn show_status(
    context: &LedgerContext,
    settings: &Settings,
    user: &UserId,
    month: Option<&str>,
) -> EnvelopeResult<()> {
    let month = parse_month(month)?;
    let snapshot = context.ledger().compute_cumulative_envelopes(user, month)?;
    print!("{}", format_snapshot(&snapshot, &settings.currency_symbol));
    Ok(())
}

/// Print realized and potential savings
pub fn show_savings(
    context: &LedgerContext,
    settings: &Settings,
    user: &UserId,
    as_of: Option<&str>,
) -> EnvelopeResult<()> {
    let as_of = parse_month(as_of)?;
    let totals = context.ledger().compute_total_savings_as_of(user, as_of)?;
    print!("{}", format_savings(&totals, as_of, &settings.currency_symbol));
    Ok(())
}

/// Print the most recent audit entries
pub fn show_history(
    context: &LedgerContext,
    user: &UserId,
    count: usize,
    all_users: bool,
) -> EnvelopeResult<()> {
    let Some(audit) = context.audit() else {
        println!("Audit logging is disabled. Enable it with 'envledger config audit_enabled true'.");
        return Ok(());
    };

    let filter = if all_users { None } else { Some(user) };
    let entries = audit.read_recent(count, filter)?;
    println!("{}", format_audit_entries(&entries));
    Ok(())
}
