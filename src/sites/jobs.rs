//! IT job postings (nofluffjobs.com)
//!
//! The results page is only used for links; every field comes from the
//! posting's own page.

use super::{absolute_url, Site};
use crate::discover::ListingFragment;
use crate::document::{Document, Locator};
use crate::extractors::{Clean, FieldExtractor, FieldSet, ListField, TextField};
use crate::record::OutputSchema;

const ORIGIN: &str = "https://nofluffjobs.com";
const SENTINEL: &str = "NaN";

/// The first links on a results page belong to the site navigation
const NAVIGATION_LINKS: usize = 8;

pub const COLUMNS: [(&str, &str); 11] = [
    ("position", "position"),
    ("company", "company"),
    ("salary", "salary"),
    ("requirements_main", "requirements_main"),
    ("requirements_secondary", "requirements_secondary"),
    ("description", "description"),
    ("tasks", "tasks"),
    ("specs", "posting_specs"),
    ("methodology", "methodology"),
    ("benefits", "benefits"),
    ("equipment", "equipment"),
];

pub struct JobsSite {
    schema: OutputSchema,
    link: Locator,
    detail: Vec<Box<dyn FieldExtractor>>,
}

impl JobsSite {
    pub fn new() -> Self {
        let detail: Vec<Box<dyn FieldExtractor>> = vec![
            Box::new(
                TextField::new("position", Locator::tag("h1").class("font-weight-bold bigger"), "unknown")
                    .or(Locator::tag("h1").class("font-weight-bold")),
            ),
            Box::new(
                TextField::new(
                    "company",
                    Locator::tag("a").class("inline-info d-flex align-items-center text-primary"),
                    "Unknown company",
                )
                .or(Locator::tag("a").class("inline-info d-flex align-items-center")),
            ),
            Box::new(ListField::new("salary", Locator::tag("h4").class("mb-0")).clean(Clean::StripSpaces)),
            Box::new(Requirements::new(
                Locator::tag("common-posting-item-tag"),
                Locator::tag("common-posting-requirements"),
            )),
            Box::new(TextField::new(
                "description",
                Locator::tag("nfj-read-more").class("font-weight-normal"),
                "No description",
            )),
            Box::new(
                ListField::new("tasks", Locator::tag("p").class("d-flex align-items-center mb-0 mb-3"))
                    .trailing(Locator::tag("p").class("d-flex align-items-center mb-0")),
            ),
            Box::new(ListField::new(
                "posting_specs",
                Locator::tag("p").class("d-inline-flex align-items-center font-size-14 detail mr-10 mb-10"),
            )),
            Box::new(
                ListField::new(
                    "methodology",
                    Locator::tag("div").class("d-flex position-relative font-size-14 mb-10"),
                )
                .trailing(Locator::tag("div").class("d-flex position-relative font-size-14")),
            ),
            Box::new(ListField::new("benefits", Locator::tag("div").class("col-sm-6 perk mt-10"))),
            Box::new(ListField::new(
                "equipment",
                Locator::tag("p").class("mobile-text mb-0 mt-1 font-size-11 text-center"),
            )),
        ];

        Self {
            schema: OutputSchema::mapped(&COLUMNS, SENTINEL),
            link: Locator::tag("a").has_attr("href"),
            detail,
        }
    }
}

impl Default for JobsSite {
    fn default() -> Self {
        Self::new()
    }
}

impl Site for JobsSite {
    fn name(&self) -> &'static str {
        "jobs"
    }

    fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    fn discover(&self, page: &Document) -> Vec<ListingFragment> {
        page.find_all(&self.link)
            .iter()
            .enumerate()
            .filter(|(i, _)| *i >= NAVIGATION_LINKS)
            .filter_map(|(_, a)| a.value().attr("href"))
            .filter(|href| href.contains("job"))
            .filter_map(|href| absolute_url(ORIGIN, href))
            .map(ListingFragment::Link)
            .collect()
    }

    fn detail_url(&self, fragment: &ListingFragment) -> Option<String> {
        fragment.link().map(String::from)
    }

    fn detail_extractors(&self) -> &[Box<dyn FieldExtractor>] {
        &self.detail
    }
}

/// Requirement tags split into must-have and nice-to-have.
///
/// The page lists every tag once and renders one group element per
/// requirement level; a tag belongs to a level when the group's text
/// contains it.
pub struct Requirements {
    tag: Locator,
    group: Locator,
}

impl Requirements {
    pub fn new(tag: Locator, group: Locator) -> Self {
        Self { tag, group }
    }
}

impl FieldExtractor for Requirements {
    fn extract(&self, scope: &Document) -> FieldSet {
        let tags = scope.texts_of(&self.tag);
        let groups = scope.texts_of(&self.group);
        let members = |group: &str| -> Vec<String> {
            tags.iter().filter(|t| group.contains(t.as_str())).cloned().collect()
        };

        let main = groups.first().map(|g| members(g.as_str())).unwrap_or_default();
        let secondary = match groups.len() {
            2 => members(groups[1].as_str()),
            _ => vec!["No secondary requirements".to_string()],
        };

        FieldSet::new()
            .with("requirements_main", main)
            .with("requirements_secondary", secondary)
    }
}
