//! Paginated harvest: discover listings page by page, fetch each detail
//! page, extract, assemble and write one CSV row per listing.
//!
//! Strictly sequential. Page N+1 is requested only after every listing of
//! page N has been written, and one request is in flight at a time.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::FailurePolicy;
use crate::criteria::SearchCriteria;
use crate::discover::{discover_listings, ListingFragment};
use crate::error::{FetchError, Result};
use crate::extractors::extract_all;
use crate::fetch::PageFetcher;
use crate::record::{assemble, Record};
use crate::sink::CsvSink;
use crate::sites::Site;

/// Receives progress of a harvest run
pub trait Progress {
    fn page_started(&mut self, page: u32, listings: usize);
    fn advance(&mut self);
    fn page_finished(&mut self, page: u32);
}

/// Reports progress through `tracing`
#[derive(Debug, Default)]
pub struct LogProgress {
    done: usize,
    total: usize,
}

impl Progress for LogProgress {
    fn page_started(&mut self, page: u32, listings: usize) {
        self.done = 0;
        self.total = listings;
        info!(page, listings, "adding page content");
    }

    fn advance(&mut self) {
        self.done += 1;
        debug!(done = self.done, total = self.total, "listing processed");
    }

    fn page_finished(&mut self, page: u32) {
        info!(page, processed = self.done, "page done");
    }
}

/// Outcome of one harvest run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestReport {
    pub pages: u32,
    pub listings: usize,
    pub rows_written: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

impl HarvestReport {
    pub fn seconds_per_record(&self) -> Option<f64> {
        (self.rows_written > 0).then(|| self.elapsed.as_secs_f64() / self.rows_written as f64)
    }
}

impl fmt::Display for HarvestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        writeln!(
            f,
            "Total execution time is: {:.2} sec ({:.2} min or {:.2} h)",
            secs,
            secs / 60.0,
            secs / 3600.0
        )?;
        writeln!(f, "Data records downloaded: {}", self.rows_written)?;
        if self.skipped > 0 {
            writeln!(f, "Listings skipped: {}", self.skipped)?;
        }
        match self.seconds_per_record() {
            Some(rate) => write!(f, "Program downloaded data at speed: {:.2} sec per one record", rate),
            None => write!(f, "No records downloaded"),
        }
    }
}

/// Drives one site through a bounded page range
pub struct Harvester<'a> {
    fetcher: &'a dyn PageFetcher,
    site: &'a dyn Site,
    policy: FailurePolicy,
}

impl<'a> Harvester<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, site: &'a dyn Site) -> Self {
        Self {
            fetcher,
            site,
            policy: FailurePolicy::default(),
        }
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Harvest into a new CSV file at `path`.
    ///
    /// The file is closed on every exit path; after a failure it holds the
    /// header and every row written before it.
    pub fn harvest_to_file(
        &self,
        criteria: &SearchCriteria,
        pages: u32,
        path: &Path,
        progress: &mut dyn Progress,
    ) -> Result<HarvestReport> {
        let mut sink = CsvSink::open(path)?;
        info!(file = %path.display(), site = self.site.name(), "output file created");
        self.run(criteria, pages, &mut sink, progress)
    }

    /// Write the header, then one row per listing on pages `1..=pages`
    pub fn run<W: Write>(
        &self,
        criteria: &SearchCriteria,
        pages: u32,
        sink: &mut CsvSink<W>,
        progress: &mut dyn Progress,
    ) -> Result<HarvestReport> {
        let started = Instant::now();
        let mut report = HarvestReport::default();

        sink.write_header(self.site.schema())?;

        for page in 1..=pages {
            let fragments = discover_listings(self.fetcher, self.site, criteria, page)?;
            report.pages += 1;
            progress.page_started(page, fragments.len());

            if fragments.is_empty() {
                info!(page, "no listings on page");
            }

            for fragment in &fragments {
                report.listings += 1;
                match self.listing_record(fragment) {
                    Ok(record) => {
                        sink.write_row(&record)?;
                        report.rows_written += 1;
                    }
                    Err(e) if self.policy == FailurePolicy::SkipListing => {
                        warn!(url = e.url(), error = %e, "skipping listing");
                        report.skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
                progress.advance();
            }

            progress.page_finished(page);
        }

        report.elapsed = started.elapsed();
        info!(
            site = self.site.name(),
            pages = report.pages,
            rows = report.rows_written,
            skipped = report.skipped,
            "harvest finished"
        );
        Ok(report)
    }

    /// Extract and assemble one listing. Only a detail-page fetch can fail.
    fn listing_record(&self, fragment: &ListingFragment) -> std::result::Result<Record, FetchError> {
        let mut sets = Vec::new();

        if let Some(markup) = fragment.markup() {
            sets.extend(extract_all(self.site.summary_extractors(), markup));
        }

        match self.site.detail_url(fragment) {
            Some(url) => {
                let detail = self.fetcher.fetch(&url)?;
                sets.extend(extract_all(self.site.detail_extractors(), &detail));
                sets.push(self.site.link_fields(&url));
                debug!(url = %url, "listing extracted");
            }
            None => debug!("listing has no detail link"),
        }

        Ok(assemble(sets, self.site.schema()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::MarketType;
    use crate::document::Document;
    use crate::error::HarvestError;
    use crate::sites::{HousingSite, JobsSite};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages and records every URL requested
    #[derive(Default)]
    struct CannedFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl CannedFetcher {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    impl PageFetcher for CannedFetcher {
        fn fetch(&self, url: &str) -> std::result::Result<Document, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(html) => Ok(Document::parse(html)),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    #[derive(Default)]
    struct CountingProgress {
        pages: Vec<(u32, usize)>,
        ticks: usize,
        finished: usize,
    }

    impl Progress for CountingProgress {
        fn page_started(&mut self, page: u32, listings: usize) {
            self.pages.push((page, listings));
        }
        fn advance(&mut self) {
            self.ticks += 1;
        }
        fn page_finished(&mut self, _page: u32) {
            self.finished += 1;
        }
    }

    fn krakow() -> SearchCriteria {
        SearchCriteria::Housing {
            market: Some(MarketType::Secondary),
            city: "krakow".to_string(),
            limit: 24,
        }
    }

    fn listing(slug: &str, title: &str, location: &str) -> String {
        format!(
            r#"<li class="css-p74l73 es62z2j17"><a href="/pl/oferta/{}">
                <div class="css-jeloly es62z2j12">{}</div>
                <span class="css-rmqm02 eclomwz0">500 000 zł</span>
                <span class="css-17o293g es62z2j9">{}</span></a></li>"#,
            slug, title, location
        )
    }

    fn results(listings: &[String]) -> String {
        format!("<html><body><ul>{}</ul></body></html>", listings.concat())
    }

    const DETAIL: &str = r#"<html><body>
        <div class="css-1qzszy5 estckra8">Powierzchnia</div><div class="css-1qzszy5 estckra8">52 m²</div>
        <div class="css-1qzszy5 estckra8">Rynek</div><div class="css-1qzszy5 estckra8">wtórny</div>
    </body></html>"#;

    fn output(sink: CsvSink<Vec<u8>>) -> Vec<Vec<String>> {
        let bytes = sink.into_inner().unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes.as_slice());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_empty_page_writes_header_only() {
        let criteria = krakow();
        let fetcher = CannedFetcher::default().page(&criteria.page_url(1), &results(&[]));
        let site = HousingSite::new();
        let mut sink = CsvSink::from_writer(Vec::new());
        let mut progress = CountingProgress::default();

        let report = Harvester::new(&fetcher, &site)
            .run(&criteria, 1, &mut sink, &mut progress)
            .unwrap();

        assert_eq!(report.rows_written, 0);
        assert_eq!(report.pages, 1);
        assert_eq!(progress.pages, vec![(1, 0)]);
        let rows = output(sink);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "id");
        assert_eq!(rows[0].len(), 19);
    }

    #[test]
    fn test_rows_follow_listing_order_across_pages() {
        let criteria = krakow();
        let fetcher = CannedFetcher::default()
            .page(&criteria.page_url(1), &results(&[]))
            .page(
                &criteria.page_url(2),
                &results(&[
                    listing("dom-ID4aaaaaa", "Pierwsze", "Kraków, Krowodrza"),
                    listing("dom-ID4bbbbbb", "Drugie", "Warszawa"),
                ]),
            )
            .page("https://www.otodom.pl/pl/oferta/dom-ID4aaaaaa", DETAIL)
            .page("https://www.otodom.pl/pl/oferta/dom-ID4bbbbbb", "<html></html>");
        let site = HousingSite::new();
        let mut sink = CsvSink::from_writer(Vec::new());
        let mut progress = CountingProgress::default();

        let report = Harvester::new(&fetcher, &site)
            .run(&criteria, 2, &mut sink, &mut progress)
            .unwrap();

        assert_eq!(report.pages, 2);
        assert_eq!(report.listings, 2);
        assert_eq!(report.rows_written, 2);
        assert_eq!(progress.ticks, 2);
        assert_eq!(progress.finished, 2);

        assert_eq!(
            *fetcher.requested.borrow(),
            vec![
                criteria.page_url(1),
                criteria.page_url(2),
                "https://www.otodom.pl/pl/oferta/dom-ID4aaaaaa".to_string(),
                "https://www.otodom.pl/pl/oferta/dom-ID4bbbbbb".to_string(),
            ]
        );

        let rows = output(sink);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 19));
        assert_eq!(&rows[1][..7], ["4aaaaaa", "Pierwsze", "500 000 zł", "Kraków", "Krowodrza", "NA", "52 m²"]);
        assert_eq!(rows[1][17], "wtórny");
        assert_eq!(&rows[2][..6], ["4bbbbbb", "Drugie", "500 000 zł", "Warszawa", "NA", "NA"]);
        assert_eq!(rows[2][6], "NA");
    }

    #[test]
    fn test_detail_failure_aborts_by_default() {
        let criteria = krakow();
        let fetcher = CannedFetcher::default()
            .page(
                &criteria.page_url(1),
                &results(&[
                    listing("ok-ID4okokok", "Ok", "Kraków"),
                    listing("gone-ID4gone00", "Gone", "Kraków"),
                    listing("never-ID4never0", "Never", "Kraków"),
                ]),
            )
            .page("https://www.otodom.pl/pl/oferta/ok-ID4okokok", DETAIL);
        let site = HousingSite::new();
        let mut sink = CsvSink::from_writer(Vec::new());

        let err = Harvester::new(&fetcher, &site)
            .run(&criteria, 1, &mut sink, &mut LogProgress::default())
            .unwrap_err();

        assert!(matches!(err, HarvestError::Fetch(FetchError::Status { status: 404, .. })));
        assert_eq!(sink.rows_written(), 1);
        assert!(!fetcher
            .requested
            .borrow()
            .iter()
            .any(|u| u.contains("never")));
        assert_eq!(output(sink).len(), 2);
    }

    #[test]
    fn test_detail_failure_skipped_when_configured() {
        let criteria = krakow();
        let fetcher = CannedFetcher::default()
            .page(
                &criteria.page_url(1),
                &results(&[
                    listing("gone-ID4gone00", "Gone", "Kraków"),
                    listing("ok-ID4okokok", "Ok", "Kraków"),
                ]),
            )
            .page("https://www.otodom.pl/pl/oferta/ok-ID4okokok", DETAIL);
        let site = HousingSite::new();
        let mut sink = CsvSink::from_writer(Vec::new());
        let mut progress = CountingProgress::default();

        let report = Harvester::new(&fetcher, &site)
            .failure_policy(FailurePolicy::SkipListing)
            .run(&criteria, 1, &mut sink, &mut progress)
            .unwrap();

        assert_eq!(report.listings, 2);
        assert_eq!(report.rows_written, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(progress.ticks, 2);
        let rows = output(sink);
        assert_eq!(rows[1][1], "Ok");
    }

    #[test]
    fn test_results_page_failure_always_aborts() {
        let criteria = SearchCriteria::Jobs {
            category: "backend".to_string(),
        };
        let fetcher = CannedFetcher::default();
        let site = JobsSite::new();
        let mut sink = CsvSink::from_writer(Vec::new());

        let result = Harvester::new(&fetcher, &site)
            .failure_policy(FailurePolicy::SkipListing)
            .run(&criteria, 3, &mut sink, &mut LogProgress::default());

        assert!(result.is_err());
        assert_eq!(fetcher.requested.borrow().len(), 1);
        assert_eq!(output(sink).len(), 1);
    }

    #[test]
    fn test_harvest_to_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d_krakow.csv");
        let criteria = krakow();
        let fetcher = CannedFetcher::default()
            .page(&criteria.page_url(1), &results(&[listing("a-ID4aaaaaa", "Flat", "Kraków, Podgórze")]))
            .page("https://www.otodom.pl/pl/oferta/a-ID4aaaaaa", DETAIL);
        let site = HousingSite::new();

        let report = Harvester::new(&fetcher, &site)
            .harvest_to_file(&criteria, 1, &path, &mut LogProgress::default())
            .unwrap();
        assert_eq!(report.rows_written, 1);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, site.schema().headers());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), headers.len());
        assert_eq!(&rows[0][4], "Podgórze");
    }

    #[test]
    fn test_report_summary() {
        let report = HarvestReport {
            pages: 2,
            listings: 4,
            rows_written: 4,
            skipped: 0,
            elapsed: Duration::from_secs(120),
        };
        assert_eq!(report.seconds_per_record(), Some(30.0));
        let text = report.to_string();
        assert!(text.contains("120.00 sec (2.00 min or 0.03 h)"));
        assert!(text.contains("Data records downloaded: 4"));
        assert!(text.contains("30.00 sec per one record"));

        assert_eq!(HarvestReport::default().seconds_per_record(), None);
    }
}
