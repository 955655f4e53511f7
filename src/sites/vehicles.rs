//! Passenger car listings (otomoto.pl)

use super::{absolute_url, Site};
use crate::discover::{element_fragments, ListingFragment};
use crate::document::{Document, Locator};
use crate::extractors::{Clean, FieldExtractor, LabelledRows, TextField};
use crate::record::OutputSchema;

const ORIGIN: &str = "https://www.otomoto.pl";
const SENTINEL: &str = "NaN";

pub const COLUMNS: [&str; 12] = [
    "Cena",
    "Marka pojazdu",
    "Model pojazdu",
    "Wersja",
    "Rok produkcji",
    "Przebieg",
    "Rodzaj paliwa",
    "Moc",
    "Skrzynia biegów",
    "Napęd",
    "Spalanie W Mieście",
    "Stan",
];

pub struct VehicleSite {
    schema: OutputSchema,
    listing: Locator,
    link: Locator,
    detail: Vec<Box<dyn FieldExtractor>>,
}

impl VehicleSite {
    pub fn new() -> Self {
        let price = TextField::new("Cena", Locator::tag("span").class("offer-price__number"), SENTINEL)
            .clean(Clean::StripSpaces);
        let params = LabelledRows::new(
            Locator::tag("li").class("offer-params__item"),
            Locator::tag("span").class("offer-params__label"),
            Locator::tag("div").class("offer-params__value"),
        );

        Self {
            schema: OutputSchema::new(&COLUMNS, SENTINEL),
            listing: Locator::tag("div").class("ooa-1nvnpye e1b25f6f5"),
            link: Locator::tag("a").has_attr("href"),
            detail: vec![Box::new(price), Box::new(params)],
        }
    }
}

impl Default for VehicleSite {
    fn default() -> Self {
        Self::new()
    }
}

impl Site for VehicleSite {
    fn name(&self) -> &'static str {
        "vehicles"
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

    fn detail_extractors(&self) -> &[Box<dyn FieldExtractor>] {
        &self.detail
    }
}
