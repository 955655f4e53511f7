//! Listing discovery on results pages

use tracing::debug;

use crate::criteria::SearchCriteria;
use crate::document::{Document, Locator};
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::sites::Site;

/// Handle on one listing of a results page
#[derive(Debug, PartialEq)]
pub enum ListingFragment {
    /// The listing's own markup, cut out of the results page
    Element(Document),
    /// Absolute URL of the listing's detail page
    Link(String),
}

impl ListingFragment {
    pub fn markup(&self) -> Option<&Document> {
        match self {
            ListingFragment::Element(doc) => Some(doc),
            ListingFragment::Link(_) => None,
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            ListingFragment::Link(url) => Some(url.as_str()),
            ListingFragment::Element(_) => None,
        }
    }
}

/// Cut every element matching `container` out of the page, in document order
pub fn element_fragments(page: &Document, container: &Locator) -> Vec<ListingFragment> {
    page.find_all(container)
        .iter()
        .map(|el| ListingFragment::Element(Document::fragment(&el.html())))
        .collect()
}

/// Fetch one results page and return its listings in document order.
///
/// An empty result is the normal end-of-results signal, not an error.
pub fn discover_listings(
    fetcher: &dyn PageFetcher,
    site: &dyn Site,
    criteria: &SearchCriteria,
    page: u32,
) -> Result<Vec<ListingFragment>, FetchError> {
    let url = criteria.page_url(page);
    let document = fetcher.fetch(&url)?;
    let fragments = site.discover(&document);
    debug!(site = site.name(), page, url = %url, listings = fragments.len(), "discovered listings");
    Ok(fragments)
}
