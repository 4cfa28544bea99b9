//! Strongly-typed identifiers
//!
//! Newtype wrappers keep user ids, envelope class ids, expense ids and
//! project ids from being mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::EnvelopeError;

/// Identifier of the account that owns a ledger
///
/// Restricted to ASCII alphanumerics, `-` and `_` because the JSON store uses
/// it as a file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(s: &str) -> Result<Self, EnvelopeError> {
        let valid = !s.is_empty()
            && s.len() <= 128
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(EnvelopeError::Validation(format!("Invalid user id: '{}'", s)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = EnvelopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Identifier of an envelope class in the catalog (e.g. `groceries`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeClassId(String);

impl EnvelopeClassId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvelopeClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EnvelopeClassId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Generates uuid-backed id newtypes with a short listing form
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $short_prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            #[doc = concat!("Short form shown in listings, e.g. `", $short_prefix, "1a2b3c4d`")]
            pub fn short(&self) -> String {
                format!("{}{}", $short_prefix, &self.0.simple().to_string()[..8])
            }

            /// Check whether a user-typed reference (full uuid or short form) names this id
            pub fn matches(&self, reference: &str) -> bool {
                let reference = reference.trim();
                let stripped = reference.strip_prefix($short_prefix).unwrap_or(reference);
                if stripped.len() < 4 {
                    return false;
                }
                let full = self.0.to_string();
                let simple = self.0.simple().to_string();
                full.starts_with(stripped) || simple.starts_with(stripped)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($short_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(
    /// Identifier of a recorded expense
    ExpenseId,
    "exp-"
);
define_id!(
    /// Identifier of a savings project
    ProjectId,
    "prj-"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_validation() {
        assert!(UserId::parse("alice_01").is_ok());
        assert!(UserId::parse("aZ-9").is_ok());
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("../etc").is_err());
        assert!(UserId::parse("a b").is_err());
    }

    #[test]
    fn test_user_id_deserialization_validates() {
        assert!(serde_json::from_str::<UserId>("\"bob\"").is_ok());
        assert!(serde_json::from_str::<UserId>("\"bo/b\"").is_err());
    }

    #[test]
    fn test_class_id_display() {
        let id = EnvelopeClassId::from("savings");
        assert_eq!(id.as_str(), "savings");
        assert_eq!(format!("{:<9}|", id), "savings  |");
    }

    #[test]
    fn test_expense_id_round_trip_via_str() {
        let id = ExpenseId::new();
        let parsed: ExpenseId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_expense_id_short_and_matches() {
        let id = ExpenseId::new();
        let short = id.short();
        assert!(short.starts_with("exp-"));
        assert_eq!(short.len(), 12);
        assert!(id.matches(&short));
        assert!(id.matches(&id.to_string()));
        assert!(!id.matches("exp-"));
    }

    #[test]
    fn test_project_id_uses_its_own_prefix() {
        let id = ProjectId::new();
        assert!(id.short().starts_with("prj-"));
        assert!(id.matches(&id.short()));
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        let stripped = id.short().replacen("prj-", "exp-", 1);
        assert!(!id.matches(&stripped));
    }
}
