//! Structural document filters.
//!
//! A [`Filter`] is a conjunction of per-field constraints: equality with a
//! value, or membership in a set of values. It is deliberately not an
//! expression language; anything richer belongs in a dedicated finder.
//!
//! # Example
//!
//! ```
//! use acado_core::Filter;
//! use serde_json::json;
//!
//! let filter = Filter::new()
//!     .eq("isActive", true)
//!     .any_of("visibility", ["public", "learners"]);
//!
//! assert!(filter.matches(&json!({"isActive": true, "visibility": "public"})));
//! assert!(!filter.matches(&json!({"isActive": true, "visibility": "staff"})));
//! assert!(Filter::new().matches(&json!({})));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Field equals the value.
    Eq(Value),
    /// Field equals one of the values.
    In(Vec<Value>),
}

impl Constraint {
    /// Check a field value against the constraint.
    ///
    /// A missing field (`None`) never matches.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Constraint::Eq(expected) => value == expected,
            Constraint::In(candidates) => candidates.contains(value),
        }
    }
}

/// Conjunction of field constraints. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    conditions: Vec<(String, Constraint)>,
}

impl Filter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter matching only active documents.
    pub fn active() -> Self {
        Self::new().eq(crate::document::ACTIVE_FIELD, true)
    }

    /// Add an equality constraint.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.into(), Constraint::Eq(value.into())));
        self
    }

    /// Add a membership constraint.
    pub fn any_of<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push((field.into(), Constraint::In(values)));
        self
    }

    /// Returns `true` if the filter has no constraints.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Iterate the `(field, constraint)` pairs.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.conditions.iter().map(|(f, c)| (f.as_str(), c))
    }

    /// Evaluate the filter against a serialized document.
    ///
    /// Non-object documents only match the empty filter.
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, constraint)| constraint.accepts(document.get(field)))
    }
}
