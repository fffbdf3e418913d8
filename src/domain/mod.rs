pub mod listing;
pub mod metric;
pub mod price_range;
pub mod search;
pub mod stats;

pub use listing::{Column, HotelDetail, HotelRecord, ListingRow};
pub use metric::{top_n, Metric, RankOrder};
pub use price_range::{nightly_price, PriceRange};
pub use search::{QueryError, SearchQuery};
pub use stats::{Spread, Summary};

/// How many rows the "top" ranking and the map highlight show.
pub const TOP_N: usize = 5;
