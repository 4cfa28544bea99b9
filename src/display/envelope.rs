//! Envelope display formatting
//!
//! Formats snapshots, savings totals, budget plans and month lists for
//! terminal output.

use crate::models::{
    BudgetPlan, EnvelopeCatalog, EnvelopeSnapshot, Month, MonthId, SavingsTotals,
};

/// Format a month's envelopes as a table
pub fn format_snapshot(snapshot: &EnvelopeSnapshot, currency: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Envelopes: {} ({})\n", snapshot.month.label(), snapshot.month));

    if !snapshot.initialized {
        output.push_str(&format!(
            "\nMonth not initialized. Run 'envledger month init {}' to set its budgets.\n",
            snapshot.month
        ));
        return output;
    }

    let name_width = snapshot
        .lines
        .iter()
        .map(|l| l.label.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);
    let rule_width = name_width + 2 + 5 * 12 + 6 + 10;

    output.push_str(&format!("{}\n", "=".repeat(rule_width)));
    output.push_str(&format!(
        "{:<width$}  {:>11} {:>11} {:>11} {:>11} {:>11} {:>5}  {}\n",
        "Envelope",
        "Budget",
        "Carry",
        "Spent",
        "Adjust",
        "Remaining",
        "%",
        "Status",
        width = name_width
    ));
    output.push_str(&format!("{}\n", "-".repeat(rule_width)));

    for line in &snapshot.lines {
        let state = &line.state;
        let marker = if line.savings { " *" } else { "" };
        output.push_str(&format!(
            "{:<width$}  {:>11} {:>11} {:>11} {:>11} {:>11} {:>5}  {}{}\n",
            line.label,
            state.initial,
            state.carry_over,
            state.spent,
            state.adjustment,
            state.remaining,
            state.percentage,
            state.status(),
            marker,
            width = name_width
        ));
    }

    output.push_str(&format!("{}\n", "-".repeat(rule_width)));
    output.push_str(&format!(
        "{:<width$}  {:>11} {:>11} {:>11} {:>11} {:>11}\n",
        "Total",
        snapshot.total_initial(),
        "",
        snapshot.total_spent(),
        "",
        snapshot.total_closing(),
        width = name_width
    ));

    let overspent: Vec<&str> = snapshot.overspent().filter(|l| !l.savings).map(|l| l.label.as_str()).collect();
    if !overspent.is_empty() {
        output.push_str(&format!("\nOverspent (covered by savings): {}\n", overspent.join(", ")));
    }
    if let Some(savings) = snapshot.savings() {
        output.push_str(&format!(
            "\n* {} balance: {}\n",
            savings.label,
            savings.state.remaining.format_with_currency(currency)
        ));
    }

    output
}

/// Format realized and potential savings
pub fn format_savings(totals: &SavingsTotals, as_of: MonthId, currency: &str) -> String {
    format!(
        "Savings as of {}\n  Realized (closed months): {}\n  Potential (incl. {}):    {}\n",
        as_of.label(),
        totals.realized.format_with_currency(currency),
        as_of,
        totals.potential.format_with_currency(currency)
    )
}

/// Format a budget plan in catalog order
pub fn format_plan(plan: &BudgetPlan, catalog: &EnvelopeCatalog, currency: &str) -> String {
    let mut output = String::new();
    for class in catalog.classes() {
        let name = catalog.display_name(&class.id, plan.display_name(&class.id));
        output.push_str(&format!(
            "  {:<20} {:>14}\n",
            name,
            plan.amount(&class.id).format_with_currency(currency)
        ));
    }
    output.push_str(&format!(
        "  {:<20} {:>14}\n",
        "Total",
        plan.total().format_with_currency(currency)
    ));
    output
}

/// Format the list of initialized months
pub fn format_month_list(months: &[Month]) -> String {
    if months.is_empty() {
        return "No months initialized.\n\nRun 'envledger month init' to set up the current month."
            .to_string();
    }

    let mut output = String::from("Months:\n");
    for month in months {
        output.push_str(&format!(
            "  {}  {:<16} created {}\n",
            month.id,
            month.id.label(),
            month.created_at.format("%Y-%m-%d")
        ));
    }
    output
}
