mod client;
mod detail;
mod listing;
mod parse;
mod scraper_error;

pub use client::{Fetch, HttpFetcher, Page};
pub use detail::{parse_detail_page, DetailEnricher, EnrichStats};
pub use listing::{parse_listing_page, sort_variants, ListingExtractor, ListingScrape, SORT_ORDERS};
pub use scraper_error::ScraperError;
