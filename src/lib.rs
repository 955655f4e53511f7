//! Listing harvester for Polish classifieds sites
//!
//! Walks the paginated search results of a site, follows each listing to its
//! detail page and writes one CSV row per listing:
//! - Vehicles (otomoto.pl)
//! - Housing (otodom.pl)
//! - Job postings (nofluffjobs.com)

pub mod config;
pub mod criteria;
pub mod discover;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod harvest;
pub mod merge;
pub mod record;
pub mod robots;
pub mod sink;
pub mod sites;

pub use config::{FailurePolicy, FetchConfig, HarvestConfig};
pub use criteria::{MarketType, SearchCriteria};
pub use discover::{discover_listings, ListingFragment};
pub use document::{Document, Locator};
pub use error::{FetchError, HarvestError, Result};
pub use extractors::{FieldExtractor, FieldSet, FieldValue};
pub use fetch::{HttpFetcher, PageFetcher};
pub use harvest::{HarvestReport, Harvester, LogProgress, Progress};
pub use merge::merge_files;
pub use record::{assemble, OutputSchema, Record};
pub use sink::CsvSink;
pub use sites::{site_for, Site};
