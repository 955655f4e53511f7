//! Fixed-width rows from loosely extracted fields

use crate::extractors::FieldSet;

/// One output column: its CSV header and the field key it is filled from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub key: String,
}

/// Ordered column set of one target site, plus the placeholder written for
/// columns that have no extracted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    columns: Vec<Column>,
    sentinel: String,
}

impl OutputSchema {
    /// Schema whose headers equal the field keys
    pub fn new(columns: &[&str], sentinel: &str) -> Self {
        Self::mapped(
            &columns.iter().map(|c| (*c, *c)).collect::<Vec<_>>(),
            sentinel,
        )
    }

    /// Schema from `(header, key)` pairs
    pub fn mapped(columns: &[(&str, &str)], sentinel: &str) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(header, key)| Column {
                    header: header.to_string(),
                    key: key.to_string(),
                })
                .collect(),
            sentinel: sentinel.to_string(),
        }
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Values aligned to an [`OutputSchema`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record(Vec<String>);

impl Record {
    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Union the field sets (later ones win) and lay the result out in schema
/// order. Always returns exactly `schema.len()` values.
pub fn assemble(field_sets: Vec<FieldSet>, schema: &OutputSchema) -> Record {
    let fields = FieldSet::union_all(field_sets);
    Record(
        schema
            .columns
            .iter()
            .map(|col| match fields.get(&col.key) {
                Some(value) => value.render(),
                None => schema.sentinel.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn housing_like() -> OutputSchema {
        OutputSchema::mapped(&[("id", "ID"), ("title", "Tytuł"), ("price", "Cena")], "NA")
    }

    #[test]
    fn test_missing_columns_get_sentinel() {
        let sets = vec![FieldSet::new().with("Cena", "450 000 zł")];
        let record = assemble(sets, &housing_like());
        assert_eq!(record.values(), ["NA", "NA", "450 000 zł"]);
    }

    #[test]
    fn test_width_matches_schema() {
        let schema = housing_like();
        for sets in [
            vec![],
            vec![FieldSet::new().with("unrelated", "x")],
            vec![
                FieldSet::new().with("ID", "6512345").with("Tytuł", "Flat"),
                FieldSet::new().with("Cena", "1").with("extra", "y"),
            ],
        ] {
            assert_eq!(assemble(sets, &schema).len(), schema.len());
        }
    }

    #[test]
    fn test_later_field_set_overrides() {
        let schema = OutputSchema::new(&["price", "title"], "NaN");
        let sets = vec![
            FieldSet::new().with("price", "100000"),
            FieldSet::new().with("price", "110000").with("title", "Flat"),
        ];
        assert_eq!(assemble(sets, &schema).values(), ["110000", "Flat"]);
    }

    #[test]
    fn test_headers_follow_mapping() {
        assert_eq!(housing_like().headers(), vec!["id", "title", "price"]);
    }
}
