//! Savings projects
//!
//! A project is a planned purchase paid out of savings. It is affordable when
//! the available budget (realized savings plus manual injections) covers its
//! amount. Projects never feed back into the envelope fold.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::EnvelopeError;

use super::ids::ProjectId;
use super::money::Money;

/// How urgent a project is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl ProjectPriority {
    /// Higher is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl fmt::Display for ProjectPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.pad("high"),
            Self::Medium => f.pad("medium"),
            Self::Low => f.pad("low"),
        }
    }
}

impl FromStr for ProjectPriority {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Self::High),
            "medium" | "m" => Ok(Self::Medium),
            "low" | "l" => Ok(Self::Low),
            other => Err(EnvelopeError::Validation(format!(
                "Unknown priority '{}' (expected high, medium or low)",
                other
            ))),
        }
    }
}

/// Whether a project has been carried out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Pending,
    Completed,
}

impl ProjectStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.pad("pending"),
            Self::Completed => f.pad("completed"),
        }
    }
}

/// A planned purchase funded from savings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,

    pub title: String,

    /// Cost of the project
    pub amount: Money,

    /// Target date
    pub date: NaiveDate,

    #[serde(default)]
    pub priority: ProjectPriority,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Materialize a new pending project with a fresh id
    pub fn from_new(new: NewProject) -> Self {
        Self {
            id: ProjectId::new(),
            title: new.title.trim().to_string(),
            amount: new.amount,
            date: new.date,
            priority: new.priority,
            status: ProjectStatus::Pending,
            note: normalize_note(new.note),
            created_at: Utc::now(),
        }
    }

    /// Overwrite the fields present in the patch, leaving the rest untouched
    pub fn apply(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(note) = patch.note {
            self.note = normalize_note(Some(note));
        }
    }

    pub fn is_affordable(&self, budget: Money) -> bool {
        budget >= self.amount
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.title, self.amount)
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Input for planning a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub priority: ProjectPriority,
    pub note: Option<String>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            amount,
            date,
            priority: ProjectPriority::default(),
            note: None,
        }
    }

    pub fn with_priority(mut self, priority: ProjectPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<(), EnvelopeError> {
        validate_title(&self.title)?;
        validate_amount(self.amount)
    }
}

/// Partial update of a project; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub priority: Option<ProjectPriority>,
    pub status: Option<ProjectStatus>,
    /// `Some("")` clears the note
    pub note: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.note.is_none()
    }

    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        match self.amount {
            Some(amount) => validate_amount(amount),
            None => Ok(()),
        }
    }
}

fn validate_title(title: &str) -> Result<(), EnvelopeError> {
    if title.trim().is_empty() {
        return Err(EnvelopeError::Validation("Project title cannot be empty".into()));
    }
    Ok(())
}

fn validate_amount(amount: Money) -> Result<(), EnvelopeError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(EnvelopeError::Validation(format!(
            "Project amount must be positive, got {}",
            amount
        )))
    }
}

/// Money available for projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBudget {
    /// Realized savings at the close of the last finished month
    pub realized: Money,

    /// Sum of manual injections
    pub injection: Money,
}

impl ProjectBudget {
    pub fn total(&self) -> Money {
        self.realized + self.injection
    }
}

/// A project together with whether the budget covers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOutlook {
    pub project: Project,
    pub affordable: bool,
}

/// Order projects for display against `budget`
///
/// Affordable projects come first, then the nearest date, then the higher
/// priority.
pub fn rank_projects(projects: Vec<Project>, budget: Money) -> Vec<ProjectOutlook> {
    let mut outlook: Vec<ProjectOutlook> = projects
        .into_iter()
        .map(|project| ProjectOutlook {
            affordable: project.is_affordable(budget),
            project,
        })
        .collect();
    outlook.sort_by(compare_outlook);
    outlook
}

fn compare_outlook(a: &ProjectOutlook, b: &ProjectOutlook) -> Ordering {
    b.affordable
        .cmp(&a.affordable)
        .then_with(|| a.project.date.cmp(&b.project.date))
        .then_with(|| b.project.priority.rank().cmp(&a.project.priority.rank()))
}
