//! Apartment sale listings (otodom.pl)
//!
//! Title, price and location come from the results page; the parameter grid
//! comes from the detail page. The site's markup uses generated class names
//! that change often, so they are kept together here.

use super::{absolute_url, Site};
use crate::discover::{element_fragments, ListingFragment};
use crate::document::{Document, Locator};
use crate::extractors::{FieldExtractor, FieldSet, LocationField, PairedGrid, TextField};
use crate::record::OutputSchema;

const ORIGIN: &str = "https://www.otodom.pl";
const SENTINEL: &str = "NA";

const LISTING: &str = "css-p74l73 es62z2j17";
const TITLE: &str = "css-jeloly es62z2j12";
const PRICE: &str = "css-rmqm02 eclomwz0";
const LOCATION: &str = "css-17o293g es62z2j9";
const GRID: &str = "css-1qzszy5 estckra8";

/// Offer ids are the last characters of the offer URL
const ID_LEN: usize = 7;

/// CSV header paired with the label the site uses for it
pub const COLUMNS: [(&str, &str); 19] = [
    ("id", "ID"),
    ("title", "Tytuł"),
    ("price", "Cena"),
    ("city", "Miasto"),
    ("district", "Dzielnica"),
    ("street", "Ulica"),
    ("area", "Powierzchnia"),
    ("rooms", "Liczba pokoi"),
    ("rent", "Czynsz"),
    ("floor", "Piętro"),
    ("year", "Rok budowy"),
    ("balcony", "Balkon / ogród / taras"),
    ("garage", "Miejsce parkingowe"),
    ("elevator", "Winda"),
    ("furnishing", "Wyposażenie"),
    ("extra_info", "Informacje dodatkowe"),
    ("seller_type", "Typ ogłoszeniodawcy"),
    ("market", "Rynek"),
    ("ownership", "Forma własności"),
];

pub struct HousingSite {
    schema: OutputSchema,
    listing: Locator,
    link: Locator,
    summary: Vec<Box<dyn FieldExtractor>>,
    detail: Vec<Box<dyn FieldExtractor>>,
}

impl HousingSite {
    pub fn new() -> Self {
        let title = TextField::new("Tytuł", Locator::tag("div").class(TITLE), SENTINEL);
        let price = TextField::new("Cena", Locator::tag("span").class(PRICE), SENTINEL);
        let location = LocationField::new(
            Locator::tag("span").class(LOCATION),
            ["Miasto", "Dzielnica", "Ulica"],
            SENTINEL,
        );

        Self {
            schema: OutputSchema::mapped(&COLUMNS, SENTINEL),
            listing: Locator::tag("li").class(LISTING),
            link: Locator::tag("a").has_attr("href"),
            summary: vec![Box::new(title), Box::new(price), Box::new(location)],
            detail: vec![Box::new(PairedGrid::new(Locator::tag("div").class(GRID)))],
        }
    }
}

impl Default for HousingSite {
    fn default() -> Self {
        Self::new()
    }
}

/// Trailing `ID_LEN` characters of the offer URL
pub fn offer_id(url: &str) -> String {
    let chars: Vec<char> = url.trim_end_matches('/').chars().collect();
    chars[chars.len().saturating_sub(ID_LEN)..].iter().collect()
}

impl Site for HousingSite {
    fn name(&self) -> &'static str {
        "housing"
    }

    fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    fn discover(&self, page: &Document) -> Vec<ListingFragment> {
        element_fragments(page, &self.listing)
    }

    fn detail_url(&self, fragment: &ListingFragment) -> Option<String> {
        let href = fragment.markup()?.attr_of(&self.link, "href")?;
        absolute_url(ORIGIN, &href)
    }

    fn summary_extractors(&self) -> &[Box<dyn FieldExtractor>] {
        &self.summary
    }

    fn detail_extractors(&self) -> &[Box<dyn FieldExtractor>] {
        &self.detail
    }

    fn link_fields(&self, url: &str) -> FieldSet {
        FieldSet::new().with("ID", offer_id(url))
    }
}
