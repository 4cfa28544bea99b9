//! Expense display formatting

use crate::audit::AuditEntry;
use crate::models::{EnvelopeCatalog, Expense, Money};

/// Format expenses as a table, newest first as given
pub fn format_expense_list(expenses: &[Expense], catalog: &EnvelopeCatalog, currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<16}  {:>12}  {}\n",
        "ID", "Date", "Envelope", "Amount", "Note"
    ));
    output.push_str(&format!("{}\n", "-".repeat(72)));

    for expense in expenses {
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<16}  {:>12}  {}\n",
            expense.id.short(),
            expense.date,
            catalog.display_name(&expense.class_id, None),
            expense.amount,
            expense.note.as_deref().unwrap_or("")
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&format!("{}\n", "-".repeat(72)));
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        expenses.len(),
        total.format_with_currency(currency)
    ));
    output
}

/// Format one expense in detail
pub fn format_expense_details(expense: &Expense, catalog: &EnvelopeCatalog, currency: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Expense: {}\n", expense.id.short()));
    output.push_str(&format!("  ID:       {}\n", expense.id));
    output.push_str(&format!(
        "  Envelope: {}\n",
        catalog.display_name(&expense.class_id, None)
    ));
    output.push_str(&format!(
        "  Amount:   {}\n",
        expense.amount.format_with_currency(currency)
    ));
    output.push_str(&format!("  Date:     {}\n", expense.date));
    if let Some(note) = &expense.note {
        output.push_str(&format!("  Note:     {}\n", note));
    }
    output
}

/// Format audit entries, one block per entry
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No recorded changes.".to_string();
    }
    entries
        .iter()
        .map(AuditEntry::format_human_readable)
        .collect::<Vec<_>>()
        .join("\n")
}
