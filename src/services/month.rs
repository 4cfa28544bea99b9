//! Month service
//!
//! Month initialization (creating the month and writing one budget per
//! catalog class) and the carry-forward helper that pre-fills a new month
//! from the previous one.

use crate::audit::{AuditEntry, EntityType};
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{BudgetPlan, EnvelopeBudget, Month, MonthId, UserId};

use super::LedgerContext;

/// Service for months and their budgets
pub struct MonthService<'a> {
    context: &'a LedgerContext,
}

impl<'a> MonthService<'a> {
    pub fn new(context: &'a LedgerContext) -> Self {
        Self { context }
    }

    /// Create the month if needed and write one budget per catalog class
    ///
    /// Classes missing from the plan are budgeted at zero. Calling this on an
    /// initialized month overwrites every class's budget; expenses are never
    /// touched.
    pub fn initialize_month(
        &self,
        user: &UserId,
        month: MonthId,
        plan: &BudgetPlan,
    ) -> EnvelopeResult<Vec<EnvelopeBudget>> {
        let catalog = self.context.catalog();
        plan.validate(catalog)
            .map_err(|e| EnvelopeError::Validation(e.to_string()))?;

        let store = self.context.store();
        let mut entries = Vec::new();

        if store.get_month(user, month)?.is_none() {
            let created = store.create_month(user, month)?;
            log::info!("Created month {} for {}", month, user);
            entries.push(
                AuditEntry::create(user, month, EntityType::Month, month.to_string(), &created)
                    .with_name(month.label()),
            );
        }

        let budgets = plan.budgets_for(catalog);
        for budget in &budgets {
            let name = catalog.display_name(&budget.class_id, budget.display_name.as_deref());
            let previous = store.upsert_envelope_budget(user, month, budget.clone())?;
            let entry = match previous {
                None => AuditEntry::create(
                    user,
                    month,
                    EntityType::EnvelopeBudget,
                    budget.class_id.as_str(),
                    budget,
                ),
                Some(previous) if &previous != budget => AuditEntry::update(
                    user,
                    month,
                    EntityType::EnvelopeBudget,
                    budget.class_id.as_str(),
                    &previous,
                    budget,
                ),
                Some(_) => continue,
            };
            entries.push(entry.with_name(name));
        }

        log::info!(
            "Initialized {} for {}: {} budgeted across {} envelopes",
            month,
            user,
            plan.total(),
            budgets.len()
        );
        self.context.record(&entries)?;
        Ok(budgets)
    }

    /// The previous calendar month's budgets as a plan, or `None` if that
    /// month has no budgets
    ///
    /// Budgets of classes no longer in the catalog are left out.
    ///
    /// Nothing is written; callers pass the plan (possibly edited) to
    /// `initialize_month`.
    pub fn carry_forward_from_previous_month(
        &self,
        user: &UserId,
        target: MonthId,
    ) -> EnvelopeResult<Option<BudgetPlan>> {
        let previous = target.prev();
        let catalog = self.context.catalog();
        let budgets: Vec<EnvelopeBudget> = self
            .context
            .store()
            .list_envelope_budgets(user, previous)?
            .into_iter()
            .filter(|b| catalog.contains(&b.class_id))
            .collect();

        if budgets.is_empty() {
            log::debug!("No budgets in {} to carry into {}", previous, target);
            return Ok(None);
        }
        Ok(Some(BudgetPlan::from_budgets(&budgets)))
    }

    /// Initialized months in fold order
    pub fn list_months(&self, user: &UserId) -> EnvelopeResult<Vec<Month>> {
        let mut months = self.context.store().list_months(user)?;
        self.context.ordering().sort_months(&mut months);
        Ok(months)
    }

    /// Budgets of a month as stored, as a plan (empty if none)
    pub fn budgets(&self, user: &UserId, month: MonthId) -> EnvelopeResult<BudgetPlan> {
        let budgets = self.context.store().list_envelope_budgets(user, month)?;
        Ok(BudgetPlan::from_budgets(&budgets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::ledger::MonthOrdering;
    use crate::models::{EnvelopeCatalog, EnvelopeClass, EnvelopeClassId, Money};
    use crate::storage::JsonStore;
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

    fn plan() -> BudgetPlan {
        BudgetPlan::new()
            .with_amount("rent", units(1000))
            .with_amount("groceries", units(300))
            .with_amount("savings", units(200))
            .with_display_name("groceries", "Food")
    }

    fn audited_context() -> (LedgerContext, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let context = LedgerContext::in_memory(EnvelopeCatalog::default())
            .with_audit(AuditLogger::new(temp_dir.path().join("audit.log")));
        (context, temp_dir)
    }

    #[test]
    fn test_initialize_writes_every_class() {
        let context = LedgerContext::in_memory(EnvelopeCatalog::default());
        let budgets = context
            .months()
            .initialize_month(&alice(), month("2024-01"), &plan())
            .unwrap();

        assert_eq!(budgets.len(), 10);
        let stored = context
            .store()
            .list_envelope_budgets(&alice(), month("2024-01"))
            .unwrap();
        assert_eq!(stored.len(), 10);
        let fuel = stored
            .iter()
            .find(|b| b.class_id == EnvelopeClassId::from("fuel"))
            .unwrap();
        assert_eq!(fuel.initial, Money::zero());
        assert_eq!(context.months().list_months(&alice()).unwrap().len(), 1);
    }

    #[test]
    fn test_reinitialize_overwrites_not_merges() {
        let context = LedgerContext::in_memory(EnvelopeCatalog::default());
        let service = context.months();
        service.initialize_month(&alice(), month("2024-01"), &plan()).unwrap();

        let smaller = BudgetPlan::new().with_amount("rent", units(900));
        service.initialize_month(&alice(), month("2024-01"), &smaller).unwrap();

        let stored = service.budgets(&alice(), month("2024-01")).unwrap();
        assert_eq!(stored.amount(&"rent".into()), units(900));
        assert_eq!(stored.amount(&"groceries".into()), Money::zero());
        assert_eq!(stored.display_name(&"groceries".into()), None);
        assert_eq!(service.list_months(&alice()).unwrap().len(), 1);
    }

    #[test]
    fn test_reinitialize_same_plan_is_idempotent() {
        let context = LedgerContext::in_memory(EnvelopeCatalog::default());
        let service = context.months();
        service.initialize_month(&alice(), month("2024-01"), &plan()).unwrap();
        let before = context
            .ledger()
            .compute_cumulative_envelopes(&alice(), month("2024-01"))
            .unwrap();

        service.initialize_month(&alice(), month("2024-01"), &plan()).unwrap();
        let after = context
            .ledger()
            .compute_cumulative_envelopes(&alice(), month("2024-01"))
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_rejects_invalid_plans() {
        let context = LedgerContext::in_memory(EnvelopeCatalog::default());
        let service = context.months();

        let unknown = BudgetPlan::new().with_amount("casino", units(5));
        let err = service
            .initialize_month(&alice(), month("2024-01"), &unknown)
            .unwrap_err();
        assert!(err.is_validation());

        let negative = BudgetPlan::new().with_amount("rent", Money::from_cents(-1));
        assert!(service
            .initialize_month(&alice(), month("2024-01"), &negative)
            .unwrap_err()
            .is_validation());

        // Nothing was written
        assert!(service.list_months(&alice()).unwrap().is_empty());
    }

    #[test]
    fn test_carry_forward() {
        let context = LedgerContext::in_memory(EnvelopeCatalog::default());
        let service = context.months();

        assert!(service
            .carry_forward_from_previous_month(&alice(), month("2024-01"))
            .unwrap()
            .is_none());

        service.initialize_month(&alice(), month("2023-12"), &plan()).unwrap();
        let carried = service
            .carry_forward_from_previous_month(&alice(), month("2024-01"))
            .unwrap()
            .unwrap();
        assert_eq!(carried.amount(&"rent".into()), units(1000));
        assert_eq!(carried.display_name(&"groceries".into()), Some("Food"));

        // Carry-forward never initializes the target month
        assert_eq!(service.list_months(&alice()).unwrap().len(), 1);
    }

    #[test]
    fn test_carry_forward_after_catalog_change() {
        let temp_dir = TempDir::new().unwrap();
        let users_dir = temp_dir.path().join("users");

        let before = LedgerContext::new(JsonStore::new(users_dir.clone()), EnvelopeCatalog::default());
        let january = BudgetPlan::new()
            .with_amount("baby", units(50))
            .with_amount("rent", units(900));
        before
            .months()
            .initialize_month(&alice(), month("2024-01"), &january)
            .unwrap();

        let narrowed = EnvelopeCatalog::new(
            vec![EnvelopeClass::new("rent", "Rent"), EnvelopeClass::new("savings", "Savings")],
            "savings".into(),
        )
        .unwrap();
        let after = LedgerContext::new(JsonStore::new(users_dir), narrowed);
        let service = after.months();

        let carried = service
            .carry_forward_from_previous_month(&alice(), month("2024-02"))
            .unwrap()
            .unwrap();
        assert_eq!(carried.amount(&"rent".into()), units(900));
        assert!(!carried.amounts().contains_key(&EnvelopeClassId::from("baby")));

        let budgets = service
            .initialize_month(&alice(), month("2024-02"), &carried)
            .unwrap();
        assert_eq!(budgets.len(), 2);
    }

    #[test]
    fn test_list_months_follows_ordering() {
        let context = LedgerContext::in_memory(EnvelopeCatalog::default())
            .with_ordering(MonthOrdering::CreationOrder);
        let service = context.months();
        service.initialize_month(&alice(), month("2024-03"), &plan()).unwrap();
        service.initialize_month(&alice(), month("2024-01"), &plan()).unwrap();

        let created: Vec<_> = service
            .list_months(&alice())
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(created, vec![month("2024-03"), month("2024-01")]);

        let chrono = LedgerContext::in_memory(EnvelopeCatalog::default());
        chrono.months().initialize_month(&alice(), month("2024-03"), &plan()).unwrap();
        chrono.months().initialize_month(&alice(), month("2024-01"), &plan()).unwrap();
        let sorted: Vec<_> = chrono
            .months()
            .list_months(&alice())
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(sorted, vec![month("2024-01"), month("2024-03")]);
    }

    #[test]
    fn test_initialize_is_audited() {
        let (context, _temp) = audited_context();
        let service = context.months();
        service.initialize_month(&alice(), month("2024-01"), &plan()).unwrap();

        let entries = context.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[0].entity_type, EntityType::Month);
        assert!(entries.iter().all(|e| e.operation == Operation::Create));

        // Only the changed class is logged on re-initialization
        let edited = plan().with_amount("rent", units(950));
        service.initialize_month(&alice(), month("2024-01"), &edited).unwrap();
        let entries = context.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 12);
        let last = entries.last().unwrap();
        assert_eq!(last.operation, Operation::Update);
        assert_eq!(last.entity_id, "rent");
        assert_eq!(last.diff_summary.as_deref(), Some("initial: 100000 -> 95000"));
    }
}
