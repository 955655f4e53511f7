//! Comma-separated location strings

use super::{FieldExtractor, FieldSet};
use crate::document::{Document, Locator};

/// Split "region, sub-region, street" into exactly three parts.
///
/// Missing parts get `fallback`; anything past the third comma is ignored.
pub fn split_location(location: &str, fallback: &str) -> [String; 3] {
    let mut parts = location.split(',').map(|p| p.trim().to_string());
    let mut next = || parts.next().unwrap_or_else(|| fallback.to_string());
    [next(), next(), next()]
}

/// Location text split into three named fields
#[derive(Debug, Clone)]
pub struct LocationField {
    locator: Locator,
    keys: [String; 3],
    fallback: String,
}

impl LocationField {
    pub fn new(locator: Locator, keys: [&str; 3], fallback: &str) -> Self {
        Self {
            locator,
            keys: keys.map(String::from),
            fallback: fallback.to_string(),
        }
    }
}

impl FieldExtractor for LocationField {
    fn extract(&self, scope: &Document) -> FieldSet {
        let parts = match scope.text_of(&self.locator) {
            Some(text) => split_location(&text, &self.fallback),
            None => [0, 1, 2].map(|_| self.fallback.clone()),
        };
        self.keys.iter().cloned().zip(parts).collect()
    }
}
