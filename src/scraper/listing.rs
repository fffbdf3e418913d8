// listing.rs
use crate::domain::HotelRecord;
use crate::scraper::client::Fetch;
use crate::scraper::parse::{
    clean_text, parse_distance, parse_price, parse_rate_review, parse_review_count,
};
use crate::scraper::ScraperError;
use crate::table::dedup_by_link;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

/// `order` values requested on top of the unsorted page. Each ordering
/// surfaces a different slice of the results, so together they cover far
/// more hotels than one page does.
pub const SORT_ORDERS: [Option<&str>; 10] = [
    None,
    Some("upsort_bh"),
    Some("price"),
    Some("price_from_high_to_low"),
    Some("review_score_and_price"),
    Some("class"),
    Some("class_asc"),
    Some("distance_from_search"),
    Some("bayesian_review_score"),
    Some("class_and_price"),
];

/// Icon sets a card may use for its rating, checked in this order.
const RATING_ICON_SETS: [&str; 3] = ["rating-stars", "rating-circles", "rating-squares"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static CARD: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="property-card"]"#));
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[data-testid="title-link"][href], h3 a[href]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="title"]"#));
static ADDRESS: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="address"]"#));
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-testid="price-and-discounted-price"]"#));
static DISTANCE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="distance"]"#));
static REVIEW: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="review-score"]"#));
static RATING_ICONS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    RATING_ICON_SETS.map(|testid| selector(&format!(r#"[data-testid="{testid}"] svg"#)))
});

/// Result of the listing stage before it is persisted.
#[derive(Debug, Default)]
pub struct ListingScrape {
    pub records: Vec<HotelRecord>,
    pub pages_fetched: usize,
    pub pages_failed: usize,
}

/// Derive one URL per sort order from the base search URL.
pub fn sort_variants(base_url: &str) -> Result<Vec<String>, ScraperError> {
    let base = Url::parse(base_url).map_err(|source| ScraperError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;

    Ok(SORT_ORDERS
        .iter()
        .map(|order| match order {
            None => base.to_string(),
            Some(order) => {
                let mut url = base.clone();
                url.query_pairs_mut().append_pair("order", order);
                url.to_string()
            }
        })
        .collect())
}

pub struct ListingExtractor<F> {
    fetcher: F,
}

impl<F: Fetch> ListingExtractor<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch every sort variant and merge the cards into one table,
    /// unique by link. A variant that fails to load is logged and skipped.
    pub fn extract(&self, base_url: &str) -> Result<ListingScrape, ScraperError> {
        let variants = sort_variants(base_url)?;
        let mut scrape = ListingScrape::default();

        for (i, variant) in variants.iter().enumerate() {
            info!(variant = i + 1, total = variants.len(), url = %variant, "fetching results page");

            match self.fetcher.fetch(variant) {
                Ok(page) => {
                    let cards = parse_listing_page(&page.body, &page.url);
                    info!(url = %page.url, cards = cards.len(), "results page parsed");
                    scrape.pages_fetched += 1;
                    scrape.records.extend(cards);
                }
                Err(e) => {
                    warn!(url = %variant, error = %e, "results page failed, continuing");
                    scrape.pages_failed += 1;
                }
            }
        }

        let before = scrape.records.len();
        scrape.records = dedup_by_link(std::mem::take(&mut scrape.records));
        info!(
            kept = scrape.records.len(),
            dropped = before - scrape.records.len(),
            "duplicate listings removed"
        );

        if scrape.pages_fetched == 0 {
            warn!(base_url, "no results page could be fetched");
        }

        Ok(scrape)
    }
}

/// Extract one record per listing card on a results page.
pub fn parse_listing_page(html: &str, page_url: &str) -> Vec<HotelRecord> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    document
        .select(&CARD)
        .filter_map(|card| parse_card(card, base.as_ref(), page_url))
        .collect()
}

/// `None` only when the card has no resolvable link; any other missing
/// field is left empty.
fn parse_card(card: ElementRef<'_>, base: Option<&Url>, page_url: &str) -> Option<HotelRecord> {
    let Some(link) = card_link(card, base) else {
        debug!(page_url, "skipping card without a link");
        return None;
    };

    let review_nodes: Vec<String> = card
        .select(&REVIEW)
        .next()
        .map(|el| {
            el.text()
                .map(clean_text)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Some(HotelRecord {
        name: first_text(card, &TITLE),
        address: first_text(card, &ADDRESS),
        price: first_text(card, &PRICE).as_deref().and_then(parse_price),
        distance: first_text(card, &DISTANCE).as_deref().and_then(parse_distance),
        rate_review: parse_rate_review(&review_nodes),
        num_review: parse_review_count(&review_nodes),
        rating_stars: rating_icons(card),
        link,
        source_url: page_url.to_string(),
        ..Default::default()
    })
}

fn card_link(card: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    let href = card.select(&TITLE_LINK).next()?.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}

fn first_text(card: ElementRef<'_>, sel: &Selector) -> Option<String> {
    card.select(sel)
        .next()
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

/// Icon count of the first icon set that has any icons; 0 when none do.
fn rating_icons(card: ElementRef<'_>) -> u32 {
    RATING_ICONS
        .iter()
        .map(|sel| card.select(sel).count())
        .find(|count| *count > 0)
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(0)
}
