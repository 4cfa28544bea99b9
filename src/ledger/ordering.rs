//! Month ordering used by the fold

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;
use crate::models::{Month, MonthId};
use crate::storage::MonthActivity;

/// Order in which months are folded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthOrdering {
    /// By calendar month
    #[default]
    Chronological,

    /// By the order months were first initialized. Matches `Chronological`
    /// as long as months are initialized in calendar order.
    CreationOrder,
}

impl MonthOrdering {
    pub fn sort_months(&self, months: &mut [Month]) {
        match self {
            Self::Chronological => months.sort_by_key(|m| m.id),
            Self::CreationOrder => months.sort_by_key(|m| m.sequence),
        }
    }

    /// History entries with id `<= upto`, in fold order
    pub fn arrange<'h>(&self, history: &'h [MonthActivity], upto: MonthId) -> Vec<&'h MonthActivity> {
        let mut months: Vec<&MonthActivity> =
            history.iter().filter(|a| a.month.id <= upto).collect();
        match self {
            Self::Chronological => months.sort_by_key(|a| a.month.id),
            Self::CreationOrder => months.sort_by_key(|a| a.month.sequence),
        }
        months
    }
}

impl fmt::Display for MonthOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chronological => f.pad("chronological"),
            Self::CreationOrder => f.pad("creation_order"),
        }
    }
}

impl FromStr for MonthOrdering {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chronological" | "calendar" => Ok(Self::Chronological),
            "creation_order" | "creation-order" | "creation" => Ok(Self::CreationOrder),
            other => Err(EnvelopeError::Config(format!(
                "Unknown month ordering '{}' (expected chronological or creation_order)",
                other
            ))),
        }
    }
}
