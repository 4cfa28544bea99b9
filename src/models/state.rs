//! Derived envelope state
//!
//! These types are computed by the ledger fold and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EnvelopeClassId;
use super::money::Money;
use super::month::MonthId;

/// Balance of one envelope class for one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeState {
    /// Amount budgeted for the month
    pub initial: Money,

    /// Sum of the month's expenses in this class
    pub spent: Money,

    /// Balance carried in from the previous folded month
    pub carry_over: Money,

    /// Savings: minus the month's total overspend of other classes.
    /// Other classes: the month's overspend, informational only.
    pub adjustment: Money,

    pub remaining: Money,

    /// Remaining as a whole percentage of `initial + carry_over`
    pub percentage: i64,
}

impl EnvelopeState {
    /// Compute `remaining` and `percentage` from the raw figures
    ///
    /// The adjustment only counts toward `remaining` for the savings class.
    pub fn settle(
        initial: Money,
        spent: Money,
        carry_over: Money,
        adjustment: Money,
        savings: bool,
    ) -> Self {
        let available = initial + carry_over;
        let remaining = if savings {
            available + adjustment - spent
        } else {
            available - spent
        };
        Self {
            initial,
            spent,
            carry_over,
            adjustment,
            remaining,
            percentage: display_percentage(remaining, available, !savings),
        }
    }

    /// Amount available before spending
    pub fn available(&self) -> Money {
        self.initial + self.carry_over
    }

    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }

    pub fn status(&self) -> EnvelopeStatus {
        EnvelopeStatus::from_percentage(self.percentage)
    }
}

/// `round(remaining / base * 100)`, rounding halves up
///
/// Zero when the base is not positive. With `floor_zero` negative results are
/// reported as zero.
pub fn display_percentage(remaining: Money, base: Money, floor_zero: bool) -> i64 {
    let base = i128::from(base.cents());
    if base <= 0 {
        return 0;
    }
    let scaled = 200 * i128::from(remaining.cents()) + base;
    let rounded = scaled.div_euclid(2 * base);
    let percentage = i64::try_from(rounded).unwrap_or(if rounded > 0 { i64::MAX } else { i64::MIN });
    if floor_zero {
        percentage.max(0)
    } else {
        percentage
    }
}

/// Health of an envelope, derived from its remaining percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// Nothing left (0% or below)
    Exhausted,
    /// Under 10% left
    Critical,
    /// Under 30% left
    Warning,
    Normal,
}

impl EnvelopeStatus {
    pub fn from_percentage(percentage: i64) -> Self {
        match percentage {
            p if p <= 0 => Self::Exhausted,
            p if p < 10 => Self::Critical,
            p if p < 30 => Self::Warning,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Exhausted => "exhausted",
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Normal => "ok",
        };
        f.pad(text)
    }
}

/// One row of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeLine {
    pub class_id: EnvelopeClassId,

    /// Resolved display name
    pub label: String,

    /// Whether this is the savings class
    pub savings: bool,

    pub state: EnvelopeState,
}

impl EnvelopeLine {
    /// Month-end balance handed to the next month
    ///
    /// Overspent non-savings envelopes close at zero since savings has
    /// already absorbed their overspend.
    pub fn closing(&self) -> Money {
        if self.savings {
            self.state.remaining
        } else {
            self.state.remaining.floor_zero()
        }
    }
}

/// Every envelope's state for one month, in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeSnapshot {
    pub month: MonthId,

    /// Whether the month has any stored budgets
    pub initialized: bool,

    pub lines: Vec<EnvelopeLine>,
}

impl EnvelopeSnapshot {
    pub fn get(&self, class_id: &EnvelopeClassId) -> Option<&EnvelopeLine> {
        self.lines.iter().find(|l| &l.class_id == class_id)
    }

    pub fn state(&self, class_id: &EnvelopeClassId) -> Option<&EnvelopeState> {
        self.get(class_id).map(|l| &l.state)
    }

    pub fn savings(&self) -> Option<&EnvelopeLine> {
        self.lines.iter().find(|l| l.savings)
    }

    pub fn total_initial(&self) -> Money {
        self.lines.iter().map(|l| l.state.initial).sum()
    }

    pub fn total_spent(&self) -> Money {
        self.lines.iter().map(|l| l.state.spent).sum()
    }

    /// Sum of month-end balances; each overspend is counted once, in savings
    pub fn total_closing(&self) -> Money {
        self.lines.iter().map(EnvelopeLine::closing).sum()
    }

    pub fn overspent(&self) -> impl Iterator<Item = &EnvelopeLine> {
        self.lines.iter().filter(|l| l.state.is_overspent())
    }
}

/// Cumulative savings figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsTotals {
    /// Savings balance as of the last fully elapsed month
    pub realized: Money,

    /// Savings balance including the current, still-open month
    pub potential: Money,
}
