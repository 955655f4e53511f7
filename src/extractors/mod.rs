//! Field extraction
//!
//! Each extractor covers one semantic group of a listing (price, location,
//! spec table, ...) and returns a [`FieldSet`]. Extractors never fail: a
//! locator that matches nothing yields the extractor's fallback value.

mod fields;
mod location;

pub use fields::*;
pub use location::*;

use std::collections::HashMap;

use crate::document::Document;

/// One extracted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Multi-valued field in document order
    List(Vec<String>),
}

impl FieldValue {
    /// Cell text for CSV output. Lists become a JSON array.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Field name to value mapping produced by one extractor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: HashMap<String, FieldValue>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge `other` into `self`; keys in `other` replace existing ones
    pub fn union(&mut self, other: FieldSet) {
        self.values.extend(other.values);
    }

    /// Union in order, later sets winning on key collisions
    pub fn union_all<I>(sets: I) -> FieldSet
    where
        I: IntoIterator<Item = FieldSet>,
    {
        let mut merged = FieldSet::new();
        for set in sets {
            merged.union(set);
        }
        merged
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = FieldSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Extracts one group of fields from a listing fragment or detail page
pub trait FieldExtractor {
    fn extract(&self, scope: &Document) -> FieldSet;
}

impl<F> FieldExtractor for F
where
    F: Fn(&Document) -> FieldSet,
{
    fn extract(&self, scope: &Document) -> FieldSet {
        self(scope)
    }
}

/// Run every extractor against the same scope, in order
pub fn extract_all(extractors: &[Box<dyn FieldExtractor>], scope: &Document) -> Vec<FieldSet> {
    extractors.iter().map(|e| e.extract(scope)).collect()
}
