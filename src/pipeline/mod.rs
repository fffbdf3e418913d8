//! Two-stage scrape: search result pages first, then each hotel's own page.
//!
//! [`Pipeline`] chains the stages in-process. The CLI can also run them as
//! separate processes via [`run_detail_process`]; either way the only thing
//! passed between them is the listing table on disk.

mod external;
mod stage;

pub use external::run_detail_process;
pub use stage::{DetailStage, EnrichedTable, ListingStage, ListingTable, Stage};

use crate::scraper::{Fetch, ScraperError};
use crate::table::{TableError, ENRICHED_FILE, LISTING_FILE};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("no results page could be fetched for {url}")]
    NothingFetched { url: String },

    #[error("could not launch stage process: {0}")]
    Spawn(#[source] io::Error),

    #[error("{stage} stage exited with status {}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    StageExited { stage: &'static str, code: Option<i32> },
}

/// What a full run produced. A failed detail stage leaves the listing
/// table in place, so the report is still `Ok` with `enrichment` holding
/// the error.
#[derive(Debug)]
pub struct PipelineReport {
    pub listing: ListingTable,
    pub enrichment: Result<EnrichedTable, PipelineError>,
}

pub struct Pipeline<L, D> {
    listing: L,
    detail: D,
}

impl<F: Fetch + Clone> Pipeline<ListingStage<F>, DetailStage<F>> {
    /// Both stages writing their tables into `dir`.
    pub fn in_dir(fetcher: F, dir: &Path) -> Self {
        Self::new(
            ListingStage::new(fetcher.clone(), dir.join(LISTING_FILE)),
            DetailStage::new(fetcher, dir.join(ENRICHED_FILE)),
        )
    }
}

impl<L, D> Pipeline<L, D>
where
    L: Stage<Input = String, Output = ListingTable>,
    D: Stage<Input = ListingTable, Output = EnrichedTable>,
{
    pub fn new(listing: L, detail: D) -> Self {
        Self { listing, detail }
    }

    pub fn run(&self, base_url: &str) -> Result<PipelineReport, PipelineError> {
        info!(stage = self.listing.name(), url = base_url, "stage starting");
        let listing = self.listing.run(base_url.to_string())?;

        info!(stage = self.detail.name(), rows = listing.records.len(), "stage starting");
        let enrichment = self.detail.run(listing.clone());
        if let Err(e) = &enrichment {
            error!(
                stage = self.detail.name(),
                error = %e,
                kept = %listing.path.display(),
                "stage failed, listing table kept"
            );
        }

        Ok(PipelineReport {
            listing,
            enrichment,
        })
    }
}

impl PipelineReport {
    /// The table the dashboard should show: enriched if that stage
    /// succeeded, else the raw listing table.
    pub fn best_path(&self) -> PathBuf {
        match &self.enrichment {
            Ok(enriched) => enriched.path.clone(),
            Err(_) => self.listing.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::Page;
    use crate::table::read_table;
    use std::collections::HashMap;
    use tempfile::tempdir;

    const BASE: &str = "https://www.booking.com/searchresults.pl.html?ss=Krakow";

    #[derive(Clone)]
    struct FakeSite(HashMap<String, String>);

    impl Fetch for FakeSite {
        fn fetch(&self, url: &str) -> Result<Page, ScraperError> {
            self.0
                .get(url)
                .map(|body| Page {
                    url: url.to_string(),
                    body: body.clone(),
                })
                .ok_or(ScraperError::UnexpectedStatus {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    fn results_page() -> String {
        r#"<div data-testid="property-card">
             <a data-testid="title-link" href="/hotel/a.html"><div data-testid="title">A</div></a>
             <span data-testid="price-and-discounted-price">400 zł</span>
           </div>
           <div data-testid="property-card">
             <a data-testid="title-link" href="/hotel/b.html"><div data-testid="title">B</div></a>
           </div>"#
            .to_string()
    }

    fn hotel_page() -> String {
        r#"<div id="wrap-hotelpage-top">
             <a class="bui_breadcrumb__link_masked" itemprop="item">Hotels (Apartment, City)</a>
             <a id="map_trigger_header_pin" data-atlas-latlng="50.06,19.93"></a>
           </div>"#
            .to_string()
    }

    #[test]
    fn both_stages_write_their_tables() {
        let mut site = HashMap::new();
        site.insert(BASE.to_string(), results_page());
        site.insert("https://www.booking.com/hotel/a.html".to_string(), hotel_page());

        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("run");
        let report = Pipeline::in_dir(FakeSite(site), &dir).run(BASE).unwrap();

        assert_eq!(report.listing.records.len(), 2);
        assert_eq!(report.listing.pages_fetched, 1);
        assert_eq!(report.listing.pages_failed, 9);

        let enriched = report.enrichment.as_ref().unwrap();
        assert_eq!(enriched.stats.enriched, 1);
        assert_eq!(report.best_path(), dir.join(ENRICHED_FILE));

        let listing_file = read_table(&dir.join(LISTING_FILE)).unwrap();
        assert_eq!(listing_file.columns.len(), 9);
        let enriched_file = read_table(&dir.join(ENRICHED_FILE)).unwrap();
        assert_eq!(enriched_file.columns.len(), 12);
        assert_eq!(enriched_file.records[0].hotel_type.as_deref(), Some("Apartment"));
        assert_eq!(enriched_file.records[1].hotel_type, None);
    }

    #[test]
    fn nothing_fetched_is_an_error_and_writes_nothing() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("run");
        let err = Pipeline::in_dir(FakeSite(HashMap::new()), &dir)
            .run(BASE)
            .unwrap_err();

        assert!(matches!(err, PipelineError::NothingFetched { .. }));
        assert!(!dir.join(LISTING_FILE).exists());
    }

    struct BrokenDetail;

    impl Stage for BrokenDetail {
        type Input = ListingTable;
        type Output = EnrichedTable;

        fn name(&self) -> &'static str {
            "detail"
        }

        fn run(&self, _input: ListingTable) -> Result<EnrichedTable, PipelineError> {
            Err(PipelineError::StageExited {
                stage: "detail",
                code: Some(1),
            })
        }
    }

    #[test]
    fn detail_failure_keeps_listing_output() {
        let mut site = HashMap::new();
        site.insert(BASE.to_string(), results_page());

        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("run");
        let pipeline = Pipeline::new(
            ListingStage::new(FakeSite(site), dir.join(LISTING_FILE)),
            BrokenDetail,
        );
        let report = pipeline.run(BASE).unwrap();

        assert!(report.enrichment.is_err());
        assert_eq!(report.best_path(), dir.join(LISTING_FILE));
        assert_eq!(read_table(&dir.join(LISTING_FILE)).unwrap().records.len(), 2);

        let reloaded = ListingTable::load(&dir.join(LISTING_FILE)).unwrap();
        assert_eq!(reloaded.records, report.listing.records);
    }

    #[test]
    fn stage_exit_message_names_the_code() {
        let err = PipelineError::StageExited {
            stage: "detail",
            code: None,
        };
        assert_eq!(err.to_string(), "detail stage exited with status unknown");
    }
}
