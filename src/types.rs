//! Core types for collection resolution.
//!
//! This module provides the records fetched from the collection endpoint, the
//! outcome of resolving each of their references, and run metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ReferenceFetchError;
use crate::reference::Reference;

/// A JSON object returned by a reference endpoint
pub type Document = Map<String, Value>;

/// A record from the collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    fields: Map<String, Value>,
}

impl Item {
    /// The `name` field, when it is a string
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Extracts the references declared under `field`, in order.
    ///
    /// A missing or null field declares none. A bare string declares one.
    /// Non-string array entries are kept as their JSON text so that every
    /// declared entry yields exactly one resolution outcome.
    pub fn references(&self, field: &str) -> Vec<Reference> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values.iter().map(reference_from_value).collect(),
            Some(value) => vec![reference_from_value(value)],
        }
    }
}

fn reference_from_value(value: &Value) -> Reference {
    match value {
        Value::String(s) => Reference::new(s.as_str()),
        other => Reference::new(other.to_string()),
    }
}

/// Outcome of dereferencing a single Reference
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedReference {
    Resolved(Document),
    Failed(ReferenceFetchError),
}

impl ResolvedReference {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The `name` of the resolved document, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Resolved(doc) => doc.get("name").and_then(Value::as_str),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ReferenceFetchError> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// An item paired with the outcomes of its references, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub item: Item,
    pub references: Vec<ResolvedReference>,
}

/// Resolution result containing every item and metadata about the run
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    /// One entry per collection item, in collection order
    pub items: Vec<ResolvedItem>,

    /// Metadata about the resolution process
    pub metadata: RunMetadata,
}

/// Metadata about a resolution run
#[derive(Debug, Clone)]
pub struct RunMetadata {
    /// The collection URL that was fetched
    pub endpoint: String,

    /// When the collection was retrieved
    pub retrieved: DateTime<Utc>,

    /// How long the run took
    pub duration: std::time::Duration,

    /// Number of items in the collection
    pub item_count: usize,

    /// Number of references declared across all items
    pub reference_count: usize,

    /// Number of references that could not be resolved
    pub failed_references: usize,
}
