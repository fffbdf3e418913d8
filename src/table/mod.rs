mod dataset;
mod dedup;
mod store;

pub use dataset::{Capabilities, Dataset, MissingColumns};
pub use dedup::{dedup_by_coordinates, dedup_by_link};
pub use store::{read_table, write_enriched_table, write_listing_table, LoadedTable, TableError};

pub const LISTING_FILE: &str = "booking_results.csv";
pub const ENRICHED_FILE: &str = "booking_results_updated.csv";
