//! Target sites
//!
//! Everything site-specific (listing locator, extractors, output schema)
//! lives behind [`Site`]; the harvester only talks to the trait.

mod housing;
mod jobs;
mod vehicles;

pub use housing::HousingSite;
pub use jobs::JobsSite;
pub use vehicles::VehicleSite;

use url::Url;

use crate::criteria::SearchCriteria;
use crate::discover::ListingFragment;
use crate::document::Document;
use crate::extractors::{FieldExtractor, FieldSet};
use crate::record::OutputSchema;

pub trait Site {
    fn name(&self) -> &'static str;

    fn schema(&self) -> &OutputSchema;

    /// Listings of one results page, in document order
    fn discover(&self, page: &Document) -> Vec<ListingFragment>;

    /// Detail page to follow for a listing, if the site needs one
    fn detail_url(&self, fragment: &ListingFragment) -> Option<String>;

    /// Extractors run against the listing's own markup
    fn summary_extractors(&self) -> &[Box<dyn FieldExtractor>] {
        &[]
    }

    /// Extractors run against the detail page
    fn detail_extractors(&self) -> &[Box<dyn FieldExtractor>] {
        &[]
    }

    /// Fields derived from the detail URL itself
    fn link_fields(&self, _url: &str) -> FieldSet {
        FieldSet::new()
    }
}

/// Site matching the criteria variant
pub fn site_for(criteria: &SearchCriteria) -> Box<dyn Site> {
    match criteria {
        SearchCriteria::Vehicles { .. } => Box::new(VehicleSite::new()),
        SearchCriteria::Housing { .. } => Box::new(HousingSite::new()),
        SearchCriteria::Jobs { .. } => Box::new(JobsSite::new()),
    }
}

/// Resolve `href` against `origin`; absolute hrefs pass through
pub(crate) fn absolute_url(origin: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    Url::parse(origin)
        .and_then(|base| base.join(href))
        .ok()
        .filter(|u| u.scheme() == "http" || u.scheme() == "https")
        .map(|u| u.to_string())
}
