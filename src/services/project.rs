//! Project service
//!
//! Savings projects and the money available for them. The budget is the
//! realized savings (closed months only) plus whatever was injected by hand;
//! projects and injections never change envelope balances.

use std::str::FromStr;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{
    rank_projects, Money, MonthId, NewProject, Project, ProjectBudget, ProjectId,
    ProjectOutlook, ProjectPatch, UserId,
};

use super::LedgerContext;

/// Service for savings projects
pub struct ProjectService<'a> {
    context: &'a LedgerContext,
}

impl<'a> ProjectService<'a> {
    pub fn new(context: &'a LedgerContext) -> Self {
        Self { context }
    }

    fn audit_month(project: &Project) -> MonthId {
        MonthId::from_date(project.date)
    }

    /// Plan a new project
    pub fn add_project(&self, user: &UserId, new: NewProject) -> EnvelopeResult<Project> {
        new.validate()?;

        let project = Project::from_new(new);
        self.context.store().insert_project(user, project.clone())?;

        log::info!("Added project {} for {}", project.id.short(), user);
        self.context.record(&[AuditEntry::create(
            user,
            Self::audit_month(&project),
            EntityType::Project,
            project.id.to_string(),
            &project,
        )
        .with_name(project.title.clone())])?;

        Ok(project)
    }

    /// Apply a partial update to a project
    pub fn update_project(
        &self,
        user: &UserId,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> EnvelopeResult<Project> {
        patch.validate()?;

        let store = self.context.store();
        let mut project = store
            .get_project(user, id)?
            .ok_or_else(|| EnvelopeError::project_not_found(id.to_string()))?;
        let before = project.clone();

        project.apply(patch);
        store.replace_project(user, project.clone())?;

        log::info!("Updated project {} for {}", id.short(), user);
        let entry = AuditEntry::update(
            user,
            Self::audit_month(&project),
            EntityType::Project,
            id.to_string(),
            &before,
            &project,
        );
        if !entry.is_noop() {
            self.context.record(&[entry.with_name(project.title.clone())])?;
        }

        Ok(project)
    }

    /// Flip a project between pending and completed
    pub fn toggle_status(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Project> {
        let current = self
            .context
            .store()
            .get_project(user, id)?
            .ok_or_else(|| EnvelopeError::project_not_found(id.to_string()))?;
        self.update_project(
            user,
            id,
            ProjectPatch {
                status: Some(current.status.toggled()),
                ..Default::default()
            },
        )
    }

    /// Delete a project, returning it
    pub fn delete_project(&self, user: &UserId, id: ProjectId) -> EnvelopeResult<Project> {
        let project = self
            .context
            .store()
            .remove_project(user, id)?
            .ok_or_else(|| EnvelopeError::project_not_found(id.to_string()))?;

        log::info!("Deleted project {} for {}", id.short(), user);
        self.context.record(&[AuditEntry::delete(
            user,
            Self::audit_month(&project),
            EntityType::Project,
            id.to_string(),
            &project,
        )
        .with_name(project.title.clone())])?;

        Ok(project)
    }

    pub fn list_projects(&self, user: &UserId) -> EnvelopeResult<Vec<Project>> {
        self.context.store().list_projects(user)
    }

    /// Find a project by full id or a unique prefix (`prj-1a2b3c4d`)
    pub fn find_project(&self, user: &UserId, reference: &str) -> EnvelopeResult<Project> {
        if let Ok(id) = ProjectId::from_str(reference.trim()) {
            if let Some(project) = self.context.store().get_project(user, id)? {
                return Ok(project);
            }
        }

        let mut matches: Vec<Project> = self
            .list_projects(user)?
            .into_iter()
            .filter(|p| p.id.matches(reference))
            .collect();

        match matches.len() {
            0 => Err(EnvelopeError::project_not_found(reference)),
            1 => Ok(matches.remove(0)),
            n => Err(EnvelopeError::Validation(format!(
                "'{}' matches {} projects; use a longer id",
                reference, n
            ))),
        }
    }

    /// Add money to the project budget; returns the new injection total
    pub fn inject_savings(&self, user: &UserId, amount: Money) -> EnvelopeResult<Money> {
        if !amount.is_positive() {
            return Err(EnvelopeError::Validation(format!(
                "Injected amount must be positive, got {}",
                amount
            )));
        }

        let store = self.context.store();
        let before = store.manual_injection(user)?;
        let after = store.add_manual_injection(user, amount)?;

        log::info!("Injected {} into project budget for {} (total {})", amount, user, after);
        self.context.record(&[AuditEntry::update(
            user,
            MonthId::current(),
            EntityType::SavingsInjection,
            "manual_injection",
            &before,
            &after,
        )])?;

        Ok(after)
    }

    pub fn manual_injection(&self, user: &UserId) -> EnvelopeResult<Money> {
        self.context.store().manual_injection(user)
    }

    /// Budget available for projects as of `current`
    pub fn available_budget_as_of(
        &self,
        user: &UserId,
        current: MonthId,
    ) -> EnvelopeResult<ProjectBudget> {
        let savings = self
            .context
            .ledger()
            .compute_total_savings_as_of(user, current)?;
        Ok(ProjectBudget {
            realized: savings.realized,
            injection: self.manual_injection(user)?,
        })
    }

    pub fn available_budget(&self, user: &UserId) -> EnvelopeResult<ProjectBudget> {
        self.available_budget_as_of(user, MonthId::current())
    }

    /// Projects ranked against the budget available as of `current`
    pub fn ranked_projects_as_of(
        &self,
        user: &UserId,
        current: MonthId,
    ) -> EnvelopeResult<(ProjectBudget, Vec<ProjectOutlook>)> {
        let budget = self.available_budget_as_of(user, current)?;
        let ranked = rank_projects(self.list_projects(user)?, budget.total());
        Ok((budget, ranked))
    }

    pub fn ranked_projects(
        &self,
        user: &UserId,
    ) -> EnvelopeResult<(ProjectBudget, Vec<ProjectOutlook>)> {
        self.ranked_projects_as_of(user, MonthId::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::models::{
        BudgetPlan, EnvelopeCatalog, NewExpense, ProjectPriority, ProjectStatus,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn alice() -> UserId {
        UserId::parse("alice").unwrap()
    }

    fn month(s: &str) -> MonthId {
        MonthId::parse(s).unwrap()
    }

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_context() -> (LedgerContext, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let context = LedgerContext::in_memory(EnvelopeCatalog::default())
            .with_audit(AuditLogger::new(temp_dir.path().join("audit.log")));
        (context, temp_dir)
    }

    /// January closes with 150 in savings
    fn seed_january(context: &LedgerContext) {
        context
            .months()
            .initialize_month(
                &alice(),
                month("2024-01"),
                &BudgetPlan::new()
                    .with_amount("rent", units(1000))
                    .with_amount("groceries", units(300))
                    .with_amount("savings", units(200)),
            )
            .unwrap();
        context
            .expenses()
            .add_expense(
                &alice(),
                month("2024-01"),
                NewExpense::new("groceries", units(350), date(2024, 1, 15)),
            )
            .unwrap();
    }

    #[test]
    fn test_add_and_find_project() {
        let (context, _temp) = create_test_context();
        let service = context.projects();

        let project = service
            .add_project(
                &alice(),
                NewProject::new("Laptop", units(900), date(2024, 6, 1))
                    .with_priority(ProjectPriority::High),
            )
            .unwrap();

        assert_eq!(service.list_projects(&alice()).unwrap(), vec![project.clone()]);
        assert_eq!(service.find_project(&alice(), &project.id.short()).unwrap(), project);
        assert!(service
            .find_project(&alice(), "prj-zzzzzzzz")
            .unwrap_err()
            .is_not_found());

        let entries = context.audit().unwrap().read_all().unwrap();
        assert_eq!(entries[0].entity_type, EntityType::Project);
        assert_eq!(entries[0].month, month("2024-06"));
        assert_eq!(entries[0].entity_name.as_deref(), Some("Laptop"));
    }

    #[test]
    fn test_add_rejects_invalid_project() {
        let (context, _temp) = create_test_context();
        let err = context
            .projects()
            .add_project(&alice(), NewProject::new("Laptop", Money::zero(), date(2024, 6, 1)))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(context.projects().list_projects(&alice()).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_and_delete() {
        let (context, _temp) = create_test_context();
        let service = context.projects();
        let project = service
            .add_project(&alice(), NewProject::new("Sofa", units(700), date(2024, 10, 1)))
            .unwrap();

        let done = service.toggle_status(&alice(), project.id).unwrap();
        assert_eq!(done.status, ProjectStatus::Completed);
        let reopened = service.toggle_status(&alice(), project.id).unwrap();
        assert_eq!(reopened.status, ProjectStatus::Pending);

        service.delete_project(&alice(), project.id).unwrap();
        assert!(service
            .delete_project(&alice(), project.id)
            .unwrap_err()
            .is_not_found());

        let entries = context.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.last().unwrap().operation, Operation::Delete);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("status: \"pending\" -> \"completed\"")
        );
    }

    #[test]
    fn test_injection_accumulates() {
        let (context, _temp) = create_test_context();
        let service = context.projects();

        assert_eq!(service.inject_savings(&alice(), units(3000)).unwrap(), units(3000));
        assert_eq!(service.inject_savings(&alice(), units(500)).unwrap(), units(3500));
        assert_eq!(service.manual_injection(&alice()).unwrap(), units(3500));
        assert!(service
            .inject_savings(&alice(), units(-10))
            .unwrap_err()
            .is_validation());

        let entries = context.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].entity_type, EntityType::SavingsInjection);
        assert_eq!(entries[1].diff_summary.as_deref(), Some("300000 -> 350000"));
    }

    #[test]
    fn test_budget_counts_realized_savings_only() {
        let (context, _temp) = create_test_context();
        seed_january(&context);
        context.projects().inject_savings(&alice(), units(100)).unwrap();

        // January is still open, so nothing is realized yet
        let open = context
            .projects()
            .available_budget_as_of(&alice(), month("2024-01"))
            .unwrap();
        assert_eq!(open.realized, Money::zero());
        assert_eq!(open.total(), units(100));

        let closed = context
            .projects()
            .available_budget_as_of(&alice(), month("2024-02"))
            .unwrap();
        assert_eq!(closed.realized, units(150));
        assert_eq!(closed.total(), units(250));
    }

    #[test]
    fn test_ranked_projects() {
        let (context, _temp) = create_test_context();
        seed_january(&context);
        let service = context.projects();
        for (title, amount, day, priority) in [
            ("Camera", 650, 1, ProjectPriority::High),
            ("Books", 40, 20, ProjectPriority::Low),
            ("Headphones", 150, 20, ProjectPriority::High),
        ] {
            service
                .add_project(
                    &alice(),
                    NewProject::new(title, units(amount), date(2024, 3, day)).with_priority(priority),
                )
                .unwrap();
        }

        let (budget, ranked) = service.ranked_projects_as_of(&alice(), month("2024-02")).unwrap();
        assert_eq!(budget.total(), units(150));
        let order: Vec<(&str, bool)> = ranked
            .iter()
            .map(|o| (o.project.title.as_str(), o.affordable))
            .collect();
        assert_eq!(
            order,
            vec![("Headphones", true), ("Books", true), ("Camera", false)]
        );
    }
}
