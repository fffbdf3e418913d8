use crate::domain::HotelRecord;
use crate::pipeline::PipelineError;
use crate::scraper::{DetailEnricher, EnrichStats, Fetch, ListingExtractor};
use crate::table::{read_table, write_listing_table};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One step of the scrape. Stages share nothing but their typed hand-over,
/// which always names the file the previous stage persisted.
pub trait Stage {
    type Input;
    type Output;

    fn name(&self) -> &'static str;
    fn run(&self, input: Self::Input) -> Result<Self::Output, PipelineError>;
}

/// Output of the listing stage: the persisted listing table.
#[derive(Debug, Clone)]
pub struct ListingTable {
    pub path: PathBuf,
    pub records: Vec<HotelRecord>,
    pub pages_fetched: usize,
    pub pages_failed: usize,
}

impl ListingTable {
    /// Pick up a table a previous (possibly separate) listing run wrote.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let loaded = read_table(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            records: loaded.records,
            pages_fetched: 0,
            pages_failed: 0,
        })
    }
}

/// Output of the detail stage.
#[derive(Debug, Clone)]
pub struct EnrichedTable {
    pub path: PathBuf,
    pub records: Vec<HotelRecord>,
    pub stats: EnrichStats,
}

pub struct ListingStage<F> {
    extractor: ListingExtractor<F>,
    output: PathBuf,
}

impl<F: Fetch> ListingStage<F> {
    pub fn new(fetcher: F, output: impl Into<PathBuf>) -> Self {
        Self {
            extractor: ListingExtractor::new(fetcher),
            output: output.into(),
        }
    }
}

impl<F: Fetch> Stage for ListingStage<F> {
    type Input = String;
    type Output = ListingTable;

    fn name(&self) -> &'static str {
        "listing"
    }

    fn run(&self, base_url: String) -> Result<ListingTable, PipelineError> {
        let scrape = self.extractor.extract(&base_url)?;
        if scrape.pages_fetched == 0 {
            return Err(PipelineError::NothingFetched { url: base_url });
        }

        write_listing_table(&self.output, &scrape.records)?;
        info!(
            rows = scrape.records.len(),
            path = %self.output.display(),
            "listing table written"
        );

        Ok(ListingTable {
            path: self.output.clone(),
            records: scrape.records,
            pages_fetched: scrape.pages_fetched,
            pages_failed: scrape.pages_failed,
        })
    }
}

pub struct DetailStage<F> {
    enricher: DetailEnricher<F>,
    output: PathBuf,
}

impl<F: Fetch> DetailStage<F> {
    pub fn new(fetcher: F, output: impl Into<PathBuf>) -> Self {
        Self {
            enricher: DetailEnricher::new(fetcher),
            output: output.into(),
        }
    }
}

impl<F: Fetch> Stage for DetailStage<F> {
    type Input = ListingTable;
    type Output = EnrichedTable;

    fn name(&self) -> &'static str {
        "detail"
    }

    fn run(&self, listing: ListingTable) -> Result<EnrichedTable, PipelineError> {
        if listing.records.is_empty() {
            warn!(path = %listing.path.display(), "listing table has no rows to enrich");
        }

        let (records, stats) = self.enricher.enrich(listing.records, &self.output)?;
        Ok(EnrichedTable {
            path: self.output.clone(),
            records,
            stats,
        })
    }
}
