//! Reusable extractors built from locators

use super::{FieldExtractor, FieldSet};
use crate::document::{element_text, find_in, Document, Locator};

/// Post-processing applied to extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clean {
    /// Surrounding whitespace removed
    #[default]
    Trim,
    /// Every space and non-breaking space removed, e.g. "129 900 PLN" -> "129900PLN"
    StripSpaces,
}

impl Clean {
    pub fn apply(self, text: &str) -> String {
        match self {
            Clean::Trim => text.trim().to_string(),
            Clean::StripSpaces => text
                .chars()
                .filter(|c| *c != ' ' && *c != '\u{a0}')
                .collect::<String>()
                .trim()
                .to_string(),
        }
    }
}

/// Scalar field taken from the first locator that matches
#[derive(Debug, Clone)]
pub struct TextField {
    key: String,
    locators: Vec<Locator>,
    fallback: String,
    clean: Clean,
}

impl TextField {
    pub fn new(key: &str, locator: Locator, fallback: &str) -> Self {
        Self {
            key: key.to_string(),
            locators: vec![locator],
            fallback: fallback.to_string(),
            clean: Clean::Trim,
        }
    }

    /// Alternative locator, tried when the earlier ones match nothing
    pub fn or(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn clean(mut self, clean: Clean) -> Self {
        self.clean = clean;
        self
    }
}

impl FieldExtractor for TextField {
    fn extract(&self, scope: &Document) -> FieldSet {
        let value = self
            .locators
            .iter()
            .find_map(|loc| scope.text_of(loc))
            .map(|text| self.clean.apply(&text))
            .unwrap_or_else(|| self.fallback.clone());
        FieldSet::new().with(self.key.as_str(), value)
    }
}

/// Multi-valued field: every match in document order
///
/// An optional trailing locator contributes one more item after the main
/// matches, for lists whose last entry is styled differently.
#[derive(Debug, Clone)]
pub struct ListField {
    key: String,
    locator: Locator,
    trailing: Option<Locator>,
    clean: Clean,
}

impl ListField {
    pub fn new(key: &str, locator: Locator) -> Self {
        Self {
            key: key.to_string(),
            locator,
            trailing: None,
            clean: Clean::Trim,
        }
    }

    pub fn trailing(mut self, locator: Locator) -> Self {
        self.trailing = Some(locator);
        self
    }

    pub fn clean(mut self, clean: Clean) -> Self {
        self.clean = clean;
        self
    }
}

impl FieldExtractor for ListField {
    fn extract(&self, scope: &Document) -> FieldSet {
        let mut items: Vec<String> = scope
            .texts_of(&self.locator)
            .iter()
            .map(|t| self.clean.apply(t))
            .collect();
        if let Some(last) = self.trailing.as_ref().and_then(|loc| scope.text_of(loc)) {
            items.push(self.clean.apply(&last));
        }
        FieldSet::new().with(self.key.as_str(), items)
    }
}

/// Grid laid out as alternating label/value cells
///
/// Matches at even positions are labels, odd positions their values. A
/// trailing label without a value is dropped.
#[derive(Debug, Clone)]
pub struct PairedGrid {
    cell: Locator,
}

impl PairedGrid {
    pub fn new(cell: Locator) -> Self {
        Self { cell }
    }
}

impl FieldExtractor for PairedGrid {
    fn extract(&self, scope: &Document) -> FieldSet {
        pair_up(scope.texts_of(&self.cell))
    }
}

/// Zip adjacent items into label -> value entries
pub fn pair_up(cells: Vec<String>) -> FieldSet {
    let labels = cells.iter().step_by(2);
    let values = cells.iter().skip(1).step_by(2);
    labels
        .zip(values)
        .map(|(label, value)| (label.clone(), value.clone()))
        .collect()
}

/// Repeated rows, each holding its own label and value element
#[derive(Debug, Clone)]
pub struct LabelledRows {
    row: Locator,
    label: Locator,
    value: Locator,
}

impl LabelledRows {
    pub fn new(row: Locator, label: Locator, value: Locator) -> Self {
        Self { row, label, value }
    }
}

impl FieldExtractor for LabelledRows {
    fn extract(&self, scope: &Document) -> FieldSet {
        let mut set = FieldSet::new();
        for row in scope.find_all(&self.row) {
            let (Some(label), Some(value)) = (find_in(&row, &self.label), find_in(&row, &self.value))
            else {
                continue;
            };
            set.insert(element_text(&label), element_text(&value));
        }
        set
    }
}
