//! Project display formatting

use crate::models::{Project, ProjectBudget, ProjectOutlook, ProjectStatus};

/// Format the project budget breakdown
pub fn format_project_budget(budget: &ProjectBudget, currency: &str) -> String {
    format!(
        "Project budget: {} (savings {} + injected {})\n",
        budget.total().format_with_currency(currency),
        budget.realized.format_with_currency(currency),
        budget.injection.format_with_currency(currency)
    )
}

/// Format ranked projects as a table
pub fn format_project_list(ranked: &[ProjectOutlook]) -> String {
    if ranked.is_empty() {
        return "No projects planned.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<24}  {:>12}  {:<6}  {:<9}  {}\n",
        "ID", "Date", "Title", "Amount", "Prio", "Status", "Funds"
    ));
    output.push_str(&format!("{}\n", "-".repeat(90)));

    for outlook in ranked {
        let project = &outlook.project;
        let funds = if outlook.affordable { "ok" } else { "short" };
        let status = match project.status {
            ProjectStatus::Completed => "done",
            ProjectStatus::Pending => "pending",
        };
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<24}  {:>12}  {:<6}  {:<9}  {}\n",
            project.id.short(),
            project.date,
            project.title,
            project.amount,
            project.priority,
            status,
            funds
        ));
    }

    let affordable = ranked.iter().filter(|o| o.affordable).count();
    output.push_str(&format!("{}\n", "-".repeat(90)));
    output.push_str(&format!(
        "{} project(s), {} within budget\n",
        ranked.len(),
        affordable
    ));
    output
}

/// Format one project in detail
pub fn format_project_details(project: &Project, currency: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Project: {}\n", project.id.short()));
    output.push_str(&format!("  ID:       {}\n", project.id));
    output.push_str(&format!("  Title:    {}\n", project.title));
    output.push_str(&format!(
        "  Amount:   {}\n",
        project.amount.format_with_currency(currency)
    ));
    output.push_str(&format!("  Date:     {}\n", project.date));
    output.push_str(&format!("  Priority: {}\n", project.priority));
    output.push_str(&format!("  Status:   {}\n", project.status));
    if let Some(note) = &project.note {
        output.push_str(&format!("  Note:     {}\n", note));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{rank_projects, Money, NewProject, ProjectPriority};
    use chrono::NaiveDate;

    fn project(title: &str, amount: i64, priority: ProjectPriority) -> Project {
        Project::from_new(
            NewProject::new(
                title,
                Money::from_units(amount),
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            )
            .with_priority(priority),
        )
    }

    #[test]
    fn test_budget_breakdown() {
        let budget = ProjectBudget {
            realized: Money::from_units(150),
            injection: Money::from_units(3000),
        };
        let output = format_project_budget(&budget, "DH");
        assert!(output.contains("3150.00 DH"));
        assert!(output.contains("savings 150.00 DH"));
    }

    #[test]
    fn test_project_list_marks_funds() {
        let ranked = rank_projects(
            vec![
                project("Camera", 650, ProjectPriority::High),
                project("Books", 40, ProjectPriority::Low),
            ],
            Money::from_units(100),
        );
        let output = format_project_list(&ranked);
        let rows: Vec<&str> = output.lines().skip(2).take(2).collect();
        assert!(rows[0].contains("Books") && rows[0].ends_with("ok"));
        assert!(rows[1].contains("Camera") && rows[1].ends_with("short"));
        assert!(output.contains("2 project(s), 1 within budget"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_project_list(&[]), "No projects planned.");
    }

    #[test]
    fn test_details() {
        let p = project("Laptop", 900, ProjectPriority::High);
        let output = format_project_details(&p, "DH");
        assert!(output.contains("Title:    Laptop"));
        assert!(output.contains("900.00 DH"));
        assert!(output.contains("Priority: high"));
        assert!(output.contains("Status:   pending"));
    }
}
