// detail.rs
use crate::domain::{HotelDetail, HotelRecord};
use crate::scraper::client::Fetch;
use crate::scraper::parse::{clean_text, parse_hotel_type, parse_lat_lng};
use crate::table::{dedup_by_coordinates, write_enriched_table, TableError};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static HOTEL_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#wrap-hotelpage-top").expect("valid selector"));
static BREADCRUMB: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a.bui_breadcrumb__link_masked[itemprop="item"]"#).expect("valid selector")
});
static MAP_PIN: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#map_trigger_header_pin[data-atlas-latlng]").expect("valid selector")
});

/// Counters for one enrichment run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichStats {
    pub fetched: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub duplicates_dropped: usize,
}

/// Parse a hotel's own page. `None` when the page has no hotel header block
/// at all; otherwise each field is filled only when present.
pub fn parse_detail_page(html: &str, page_url: &str) -> Option<HotelDetail> {
    let document = Html::parse_document(html);
    let block = document.select(&HOTEL_BLOCK).next()?;

    // The breadcrumb trail can sit outside the header block.
    let hotel_type = document
        .select(&BREADCRUMB)
        .map(|a| clean_text(&a.text().collect::<String>()))
        .find_map(|text| parse_hotel_type(&text));

    let coords = block
        .select(&MAP_PIN)
        .next()
        .and_then(|pin| pin.value().attr("data-atlas-latlng"))
        .and_then(parse_lat_lng);

    Some(HotelDetail {
        link: page_url.to_string(),
        hotel_type,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
    })
}

/// Visits every hotel page in a table and merges the parsed details back
/// into it, persisting the whole table after each merged row.
pub struct DetailEnricher<F> {
    fetcher: F,
}

impl<F: Fetch> DetailEnricher<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn enrich(
        &self,
        mut records: Vec<HotelRecord>,
        output: &Path,
    ) -> Result<(Vec<HotelRecord>, EnrichStats), TableError> {
        let mut stats = EnrichStats::default();

        let mut seen = HashSet::new();
        let links: Vec<String> = records
            .iter()
            .map(|r| r.link.clone())
            .filter(|l| !l.is_empty() && seen.insert(l.clone()))
            .collect();

        // An empty or fully failing run still leaves a table with every column.
        write_enriched_table(output, &records)?;

        for (i, link) in links.iter().enumerate() {
            debug!(n = i + 1, total = links.len(), link = %link, "fetching hotel page");

            let page = match self.fetcher.fetch(link) {
                Ok(page) => page,
                Err(e) => {
                    warn!(link = %link, error = %e, "hotel page failed, skipping");
                    stats.skipped += 1;
                    continue;
                }
            };
            stats.fetched += 1;

            let Some(detail) = parse_detail_page(&page.body, &page.url) else {
                warn!(link = %link, "hotel page has no detail block, skipping");
                stats.skipped += 1;
                continue;
            };

            let Some(row) = records.iter_mut().find(|r| r.link == detail.link) else {
                warn!(link = %link, landed_on = %detail.link, "hotel page matches no row, dropping");
                stats.skipped += 1;
                continue;
            };

            row.apply_detail(&detail);
            stats.enriched += 1;
            write_enriched_table(output, &records)?;
        }

        let before = records.len();
        let records = dedup_by_coordinates(records);
        stats.duplicates_dropped = before - records.len();
        write_enriched_table(output, &records)?;

        info!(
            fetched = stats.fetched,
            enriched = stats.enriched,
            skipped = stats.skipped,
            duplicates_dropped = stats.duplicates_dropped,
            path = %output.display(),
            "enrichment finished"
        );

        Ok((records, stats))
    }
}
