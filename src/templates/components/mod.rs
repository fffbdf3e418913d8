pub mod card;
pub mod error;
pub mod notice;

pub use card::{count_card, hotel_card, metric_card};
pub use error::error_page;
pub use notice::{notice, Tone};
