//! Envelope class catalog
//!
//! The catalog is the fixed, ordered list of envelope classes a ledger
//! budgets for. Exactly one class is the savings class, which absorbs every
//! other envelope's overspend. The catalog is configuration: it is built once
//! and passed to the services rather than read from a global.

use serde::{Deserialize, Serialize};

use super::ids::EnvelopeClassId;
use crate::error::{EnvelopeError, EnvelopeResult};

/// One entry of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeClass {
    pub id: EnvelopeClassId,
    pub label: String,
}

impl EnvelopeClass {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: EnvelopeClassId::new(id),
            label: label.into(),
        }
    }
}

/// Serialized, unvalidated form of a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSpec {
    classes: Vec<EnvelopeClass>,
    savings: EnvelopeClassId,
}

/// Ordered catalog of envelope classes with a distinguished savings class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogSpec", into = "CatalogSpec")]
pub struct EnvelopeCatalog {
    classes: Vec<EnvelopeClass>,
    savings: EnvelopeClassId,
}

impl EnvelopeCatalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and a savings
    /// class that is not part of the list
    pub fn new(classes: Vec<EnvelopeClass>, savings: EnvelopeClassId) -> EnvelopeResult<Self> {
        if classes.is_empty() {
            return Err(EnvelopeError::Catalog("catalog has no classes".into()));
        }

        for (i, class) in classes.iter().enumerate() {
            if class.id.as_str().trim().is_empty() {
                return Err(EnvelopeError::Catalog("class id cannot be empty".into()));
            }
            if classes[..i].iter().any(|c| c.id == class.id) {
                return Err(EnvelopeError::Catalog(format!(
                    "duplicate class id '{}'",
                    class.id
                )));
            }
        }

        if !classes.iter().any(|c| c.id == savings) {
            return Err(EnvelopeError::Catalog(format!(
                "savings class '{}' is not in the catalog",
                savings
            )));
        }

        Ok(Self { classes, savings })
    }

    /// Classes in display order
    pub fn classes(&self) -> &[EnvelopeClass] {
        &self.classes
    }

    pub fn class_ids(&self) -> impl Iterator<Item = &EnvelopeClassId> {
        self.classes.iter().map(|c| &c.id)
    }

    pub fn savings(&self) -> &EnvelopeClassId {
        &self.savings
    }

    pub fn is_savings(&self, id: &EnvelopeClassId) -> bool {
        &self.savings == id
    }

    pub fn get(&self, id: &EnvelopeClassId) -> Option<&EnvelopeClass> {
        self.classes.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &EnvelopeClassId) -> bool {
        self.get(id).is_some()
    }

    /// Look up a class by id, failing with a not-found error
    pub fn require(&self, id: &EnvelopeClassId) -> EnvelopeResult<&EnvelopeClass> {
        self.get(id)
            .ok_or_else(|| EnvelopeError::class_not_found(id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Resolve the name shown for a class: a non-blank user override first,
    /// then the catalog label, then the raw id
    pub fn display_name(&self, id: &EnvelopeClassId, name_override: Option<&str>) -> String {
        if let Some(name) = name_override.map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.get(id) {
            Some(class) if !class.label.trim().is_empty() => class.label.clone(),
            _ => id.as_str().to_string(),
        }
    }
}

impl Default for EnvelopeCatalog {
    /// Rent, fuel, groceries, leisure, sport, charity, savings, contingency,
    /// baby and subscriptions, with `savings` as the savings class
    fn default() -> Self {
        let classes = vec![
            EnvelopeClass::new("rent", "Rent"),
            EnvelopeClass::new("fuel", "Fuel"),
            EnvelopeClass::new("groceries", "Groceries"),
            EnvelopeClass::new("leisure", "Leisure"),
            EnvelopeClass::new("sport", "Sport"),
            EnvelopeClass::new("charity", "Charity"),
            EnvelopeClass::new("savings", "Savings"),
            EnvelopeClass::new("contingency", "Contingency"),
            EnvelopeClass::new("baby", "Baby"),
            EnvelopeClass::new("subscriptions", "Subscriptions"),
        ];
        Self {
            classes,
            savings: EnvelopeClassId::new("savings"),
        }
    }
}

impl TryFrom<CatalogSpec> for EnvelopeCatalog {
    type Error = EnvelopeError;

    fn try_from(spec: CatalogSpec) -> Result<Self, Self::Error> {
        Self::new(spec.classes, spec.savings)
    }
}

impl From<EnvelopeCatalog> for CatalogSpec {
    fn from(catalog: EnvelopeCatalog) -> Self {
        Self {
            classes: catalog.classes,
            savings: catalog.savings,
        }
    }
}
