//! Carry-forward fold
//!
//! Walks a user's months in order, carrying each envelope's month-end
//! balance into the next month. A non-savings envelope never carries a
//! negative balance: its overspend is added to the month's deficit, its
//! balance clamps to zero, and the deficit is taken out of the savings
//! envelope instead. Savings is never clamped and may go negative.
//!
//! Everything here is pure; callers load the history from a store first.

use std::collections::HashMap;

use crate::models::{
    EnvelopeCatalog, EnvelopeClassId, EnvelopeLine, EnvelopeSnapshot, EnvelopeState, Money,
    MonthId, SavingsTotals,
};
use crate::storage::MonthActivity;

use super::ordering::MonthOrdering;

/// One envelope at the close of a folded month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassClose {
    pub class_id: EnvelopeClassId,
    pub state: EnvelopeState,

    /// Balance handed to the next month
    pub closing: Money,
}

/// Every envelope at the close of a folded month, in catalog order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthClose {
    pub month: MonthId,
    pub classes: Vec<ClassClose>,

    /// Total overspend of the non-savings envelopes
    pub deficit: Money,
}

impl MonthClose {
    pub fn get(&self, class_id: &EnvelopeClassId) -> Option<&ClassClose> {
        self.classes.iter().find(|c| &c.class_id == class_id)
    }
}

/// Running carry state across months
pub struct CarryFold<'c> {
    catalog: &'c EnvelopeCatalog,
    carry: HashMap<EnvelopeClassId, Money>,
}

impl<'c> CarryFold<'c> {
    /// Start with a zero carry for every class
    pub fn new(catalog: &'c EnvelopeCatalog) -> Self {
        Self {
            catalog,
            carry: HashMap::new(),
        }
    }

    /// Carry currently held for a class
    pub fn carry(&self, class_id: &EnvelopeClassId) -> Money {
        self.carry.get(class_id).copied().unwrap_or_default()
    }

    /// Fold one month and advance the carry
    pub fn apply(&mut self, activity: &MonthActivity) -> MonthClose {
        let catalog = self.catalog;
        let mut initial: HashMap<&EnvelopeClassId, Money> = HashMap::new();
        for budget in &activity.budgets {
            initial.insert(&budget.class_id, budget.initial);
        }
        let mut spent: HashMap<&EnvelopeClassId, Money> = HashMap::new();
        for expense in &activity.expenses {
            *spent.entry(&expense.class_id).or_default() += expense.amount;
        }

        let figures = |id: &EnvelopeClassId| {
            (
                initial.get(id).copied().unwrap_or_default(),
                spent.get(id).copied().unwrap_or_default(),
            )
        };

        let mut deficit = Money::zero();
        let mut classes = Vec::with_capacity(catalog.len());
        for id in catalog.class_ids() {
            let (initial, spent) = figures(id);
            let carry = self.carry(id);
            if catalog.is_savings(id) {
                // Settled once the deficit is known
                classes.push(ClassClose {
                    class_id: id.clone(),
                    state: EnvelopeState::default(),
                    closing: Money::zero(),
                });
                continue;
            }

            let remaining = initial + carry - spent;
            let overspend = if remaining.is_negative() { remaining.abs() } else { Money::zero() };
            deficit += overspend;
            classes.push(ClassClose {
                class_id: id.clone(),
                state: EnvelopeState::settle(initial, spent, carry, overspend, false),
                closing: remaining.floor_zero(),
            });
        }

        let savings_id = catalog.savings();
        if let Some(savings) = classes.iter_mut().find(|c| &c.class_id == savings_id) {
            let (initial, spent) = figures(savings_id);
            let state = EnvelopeState::settle(initial, spent, self.carry(savings_id), -deficit, true);
            savings.closing = state.remaining;
            savings.state = state;
        }

        for class in &classes {
            self.carry.insert(class.class_id.clone(), class.closing);
        }

        log::debug!(
            "Folded {}: deficit {}, savings closing {}",
            activity.month.id,
            deficit,
            self.carry(savings_id)
        );

        MonthClose {
            month: activity.month.id,
            classes,
            deficit,
        }
    }
}

/// Envelope states of `target` after folding every month up to it
///
/// A target month missing from the history yields all-zero states.
pub fn cumulative_snapshot(
    catalog: &EnvelopeCatalog,
    history: &[MonthActivity],
    target: MonthId,
    ordering: MonthOrdering,
) -> EnvelopeSnapshot {
    let mut fold = CarryFold::new(catalog);
    let mut target_close = None;
    let mut target_activity = None;
    for activity in ordering.arrange(history, target) {
        let close = fold.apply(activity);
        if activity.month.id == target {
            target_close = Some(close);
            target_activity = Some(activity);
        }
    }

    let name_override = |id: &EnvelopeClassId| {
        target_activity
            .and_then(|a| a.budgets.iter().find(|b| &b.class_id == id))
            .and_then(|b| b.display_name.as_deref())
    };

    let lines = catalog
        .class_ids()
        .map(|id| EnvelopeLine {
            class_id: id.clone(),
            label: catalog.display_name(id, name_override(id)),
            savings: catalog.is_savings(id),
            state: target_close
                .as_ref()
                .and_then(|close| close.get(id))
                .map(|c| c.state)
                .unwrap_or_default(),
        })
        .collect();

    EnvelopeSnapshot {
        month: target,
        initialized: target_activity.map_or(false, |a| !a.budgets.is_empty()),
        lines,
    }
}

/// Realized and potential savings as of `current`
///
/// `potential` is the savings balance of the last month in fold order;
/// `realized` only counts months strictly before `current`. Under
/// [`MonthOrdering::CreationOrder`] each month's balance comes from its own
/// [`cumulative_snapshot`], which folds only the months up to it.
pub fn total_savings(
    catalog: &EnvelopeCatalog,
    history: &[MonthActivity],
    current: MonthId,
    ordering: MonthOrdering,
) -> SavingsTotals {
    let balances: Vec<(MonthId, Money)> = match ordering {
        MonthOrdering::Chronological => {
            let mut fold = CarryFold::new(catalog);
            ordering
                .arrange(history, current)
                .into_iter()
                .map(|activity| {
                    let close = fold.apply(activity);
                    let balance = close
                        .get(catalog.savings())
                        .map(|c| c.closing)
                        .unwrap_or_default();
                    (activity.month.id, balance)
                })
                .collect()
        }
        MonthOrdering::CreationOrder => ordering
            .arrange(history, current)
            .into_iter()
            .map(|activity| {
                let snapshot = cumulative_snapshot(catalog, history, activity.month.id, ordering);
                let balance = snapshot
                    .savings()
                    .map(|line| line.state.remaining)
                    .unwrap_or_default();
                (activity.month.id, balance)
            })
            .collect(),
    };

    let mut totals = SavingsTotals::default();
    for (month, balance) in balances {
        totals.potential = balance;
        if month < current {
            totals.realized = balance;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnvelopeBudget, EnvelopeClass, Expense, Month, NewExpense};
    use chrono::NaiveDate;

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    fn id(s: &str) -> EnvelopeClassId {
        EnvelopeClassId::from(s)
    }

    fn month_id(s: &str) -> MonthId {
        MonthId::parse(s).unwrap()
    }

    fn catalog() -> EnvelopeCatalog {
        EnvelopeCatalog::new(
            vec![
                EnvelopeClass::new("rent", "Rent"),
                EnvelopeClass::new("groceries", "Groceries"),
                EnvelopeClass::new("fuel", "Fuel"),
                EnvelopeClass::new("savings", "Savings"),
            ],
            id("savings"),
        )
        .unwrap()
    }

    struct MonthBuilder {
        activity: MonthActivity,
    }

    impl MonthBuilder {
        fn new(month: &str, sequence: u64) -> Self {
            Self {
                activity: MonthActivity {
                    month: Month::new(month_id(month), sequence),
                    budgets: Vec::new(),
                    expenses: Vec::new(),
                },
            }
        }

        fn budget(mut self, class: &str, amount: i64) -> Self {
            self.activity
                .budgets
                .push(EnvelopeBudget::new(id(class), units(amount)));
            self
        }

        fn expense(mut self, class: &str, amount: i64) -> Self {
            let date = self.activity.month.id.first_day();
            self.activity
                .expenses
                .push(Expense::from_new(NewExpense::new(class, units(amount), date)));
            self
        }

        fn build(self) -> MonthActivity {
            self.activity
        }
    }

    fn january() -> MonthActivity {
        MonthBuilder::new("2024-01", 0)
            .budget("rent", 1000)
            .budget("groceries", 300)
            .budget("savings", 200)
            .expense("groceries", 350)
            .build()
    }

    fn february() -> MonthActivity {
        MonthBuilder::new("2024-02", 1)
            .budget("groceries", 300)
            .budget("savings", 200)
            .build()
    }

    /// A longer history with overspends in several classes
    fn bumpy_history() -> Vec<MonthActivity> {
        vec![
            MonthBuilder::new("2023-11", 0)
                .budget("rent", 900)
                .budget("groceries", 250)
                .budget("fuel", 80)
                .budget("savings", 100)
                .expense("groceries", 310)
                .expense("fuel", 95)
                .build(),
            MonthBuilder::new("2023-12", 1)
                .budget("rent", 900)
                .budget("groceries", 250)
                .budget("fuel", 80)
                .budget("savings", 50)
                .expense("rent", 900)
                .expense("groceries", 120)
                .expense("savings", 400)
                .build(),
            MonthBuilder::new("2024-01", 2)
                .budget("groceries", 100)
                .budget("savings", 0)
                .expense("groceries", 260)
                .expense("fuel", 20)
                .expense("unknown", 5000)
                .build(),
            MonthBuilder::new("2024-02", 3)
                .budget("rent", 900)
                .budget("savings", 300)
                .build(),
        ]
    }

    fn fold_all(history: &[MonthActivity]) -> Vec<MonthClose> {
        let catalog = catalog();
        let mut fold = CarryFold::new(&catalog);
        MonthOrdering::Chronological
            .arrange(history, month_id("9999-12"))
            .into_iter()
            .map(|a| fold.apply(a))
            .collect()
    }

    #[test]
    fn test_january_overspend_moves_to_savings() {
        let snapshot = cumulative_snapshot(&catalog(), &[january()], month_id("2024-01"), MonthOrdering::Chronological);

        let groceries = snapshot.state(&id("groceries")).unwrap();
        assert_eq!(groceries.remaining, units(-50));
        assert_eq!(groceries.adjustment, units(50));
        assert_eq!(groceries.percentage, 0);

        let savings = snapshot.state(&id("savings")).unwrap();
        assert_eq!(savings.remaining, units(150));
        assert_eq!(savings.adjustment, units(-50));

        let rent = snapshot.state(&id("rent")).unwrap();
        assert_eq!(rent.remaining, units(1000));
        assert_eq!(rent.percentage, 100);
        assert!(snapshot.initialized);
    }

    #[test]
    fn test_february_carries_clamped_balances() {
        let history = vec![january(), february()];
        let snapshot = cumulative_snapshot(&catalog(), &history, month_id("2024-02"), MonthOrdering::Chronological);

        let groceries = snapshot.state(&id("groceries")).unwrap();
        assert_eq!(groceries.carry_over, Money::zero());
        assert_eq!(groceries.remaining, units(300));

        let savings = snapshot.state(&id("savings")).unwrap();
        assert_eq!(savings.carry_over, units(150));
        assert_eq!(savings.remaining, units(350));
        assert_eq!(savings.adjustment, Money::zero());

        // Rent was not budgeted in February but carries January's balance
        let rent = snapshot.state(&id("rent")).unwrap();
        assert_eq!(rent.initial, Money::zero());
        assert_eq!(rent.carry_over, units(1000));
        assert_eq!(rent.remaining, units(1000));
    }

    #[test]
    fn test_missing_target_month_is_all_zero() {
        let snapshot = cumulative_snapshot(&catalog(), &[january()], month_id("2024-05"), MonthOrdering::Chronological);
        assert!(!snapshot.initialized);
        assert_eq!(snapshot.lines.len(), 4);
        assert!(snapshot.lines.iter().all(|l| l.state == EnvelopeState::default()));

        let empty = cumulative_snapshot(&catalog(), &[], month_id("2024-01"), MonthOrdering::Chronological);
        assert!(empty.lines.iter().all(|l| l.state.remaining.is_zero()));
    }

    #[test]
    fn test_later_months_do_not_affect_target() {
        let march = MonthBuilder::new("2024-03", 2)
            .budget("rent", 1)
            .budget("savings", 10)
            .expense("rent", 5000)
            .build();
        let history = vec![january(), february(), march];

        let snapshot = cumulative_snapshot(&catalog(), &history, month_id("2024-02"), MonthOrdering::Chronological);
        assert_eq!(snapshot.state(&id("savings")).unwrap().remaining, units(350));
    }

    #[test]
    fn test_deficit_conservation() {
        for close in fold_all(&bumpy_history()) {
            let overspend: Money = close
                .classes
                .iter()
                .filter(|c| c.class_id != id("savings"))
                .map(|c| c.state.adjustment)
                .sum();
            let savings = close.get(&id("savings")).unwrap();
            assert_eq!(overspend, -savings.state.adjustment, "month {}", close.month);
            assert_eq!(overspend, close.deficit);
        }
    }

    #[test]
    fn test_carry_continuity_and_clamping() {
        let closes = fold_all(&bumpy_history());
        for pair in closes.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            for class in &next.classes {
                let before = prev.get(&class.class_id).unwrap();
                assert_eq!(class.state.carry_over, before.closing, "{} into {}", class.class_id, next.month);
            }
        }
        for close in &closes {
            for class in close.classes.iter().filter(|c| c.class_id != id("savings")) {
                assert!(!class.closing.is_negative(), "{} in {}", class.class_id, close.month);
            }
        }
    }

    #[test]
    fn test_savings_can_go_negative() {
        let closes = fold_all(&bumpy_history());
        // November: groceries -60, fuel -15 -> savings 100 - 75 = 25
        assert_eq!(closes[0].get(&id("savings")).unwrap().closing, units(25));
        // December: savings 25 + 50 - 400 spent = -325
        let december = closes[1].get(&id("savings")).unwrap();
        assert_eq!(december.closing, units(-325));
        assert_eq!(december.state.percentage, -433);
        // January: groceries 130 + 100 - 260 = -30, fuel 80 - 20 = 60
        let january = closes[2].get(&id("savings")).unwrap();
        assert_eq!(january.closing, units(-355));
        assert_eq!(closes[2].deficit, units(30));
        assert_eq!(closes[2].get(&id("fuel")).unwrap().closing, units(60));
    }

    #[test]
    fn test_unknown_classes_are_ignored() {
        let closes = fold_all(&bumpy_history());
        assert!(closes[2].get(&id("unknown")).is_none());
        assert_eq!(closes[2].classes.len(), 4);
    }

    #[test]
    fn test_reapplying_same_budgets_is_stable() {
        let mut history = vec![january(), february()];
        let first = cumulative_snapshot(&catalog(), &history, month_id("2024-02"), MonthOrdering::Chronological);
        history[1].budgets = february().budgets;
        let second = cumulative_snapshot(&catalog(), &history, month_id("2024-02"), MonthOrdering::Chronological);
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_name_override_from_target_month() {
        let mut feb = february();
        feb.budgets[0] = EnvelopeBudget::new(id("groceries"), units(300))
            .with_display_name(Some("Food".into()));
        let history = vec![january(), feb];
        let snapshot = cumulative_snapshot(&catalog(), &history, month_id("2024-02"), MonthOrdering::Chronological);
        assert_eq!(snapshot.get(&id("groceries")).unwrap().label, "Food");
        assert_eq!(snapshot.get(&id("rent")).unwrap().label, "Rent");
    }

    #[test]
    fn test_creation_order_differs_when_months_initialized_backwards() {
        // February was initialized before January
        let mut jan = january();
        jan.month.sequence = 1;
        let mut feb = february();
        feb.month.sequence = 0;
        feb.expenses.push(Expense::from_new(NewExpense::new(
            "groceries",
            units(400),
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
        )));
        let history = vec![jan, feb];

        let chrono = cumulative_snapshot(&catalog(), &history, month_id("2024-02"), MonthOrdering::Chronological);
        let created = cumulative_snapshot(&catalog(), &history, month_id("2024-02"), MonthOrdering::CreationOrder);

        // Chronological: savings 150 carried in, minus 100 overspend
        assert_eq!(chrono.state(&id("savings")).unwrap().remaining, units(250));
        // Creation order folds February first with nothing carried in
        assert_eq!(created.state(&id("savings")).unwrap().remaining, units(100));
    }

    #[test]
    fn test_total_savings_in_creation_order_refolds_each_month() {
        // February was initialized before January
        let mut jan = january();
        jan.month.sequence = 1;
        let mut feb = february();
        feb.month.sequence = 0;
        feb.expenses.push(Expense::from_new(NewExpense::new(
            "groceries",
            units(400),
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
        )));
        let history = vec![jan, feb];
        let current = month_id("2024-03");

        let totals = total_savings(&catalog(), &history, current, MonthOrdering::CreationOrder);

        // January is last in creation order and nothing before it is folded in
        let january_alone =
            cumulative_snapshot(&catalog(), &history, month_id("2024-01"), MonthOrdering::CreationOrder);
        assert_eq!(january_alone.state(&id("savings")).unwrap().remaining, units(150));
        assert_eq!(totals.potential, units(150));
        assert_eq!(totals.realized, units(150));

        let up_to_feb = total_savings(&catalog(), &history, month_id("2024-02"), MonthOrdering::CreationOrder);
        assert_eq!(up_to_feb.potential, units(150));
        assert_eq!(up_to_feb.realized, units(150));

        let chrono = total_savings(&catalog(), &history, current, MonthOrdering::Chronological);
        assert_eq!(chrono.potential, units(250));
    }

    #[test]
    fn test_total_savings_mid_month() {
        let mut feb = february();
        feb.expenses.push(Expense::from_new(NewExpense::new(
            "groceries",
            units(320),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        )));
        let history = vec![january(), feb];

        let totals = total_savings(&catalog(), &history, month_id("2024-02"), MonthOrdering::Chronological);
        assert_eq!(totals.realized, units(150));
        assert_eq!(totals.potential, units(330));
    }

    #[test]
    fn test_total_savings_past_months_only() {
        let history = vec![january(), february()];
        let totals = total_savings(&catalog(), &history, month_id("2024-06"), MonthOrdering::Chronological);
        assert_eq!(totals.realized, units(350));
        assert_eq!(totals.potential, totals.realized);

        let nothing = total_savings(&catalog(), &[], month_id("2024-06"), MonthOrdering::Chronological);
        assert_eq!(nothing, SavingsTotals::default());
    }

    #[test]
    fn test_total_savings_ignores_future_months() {
        let history = vec![january(), february()];
        let totals = total_savings(&catalog(), &history, month_id("2024-01"), MonthOrdering::Chronological);
        assert_eq!(totals.realized, Money::zero());
        assert_eq!(totals.potential, units(150));
    }
}
