use serde::{Deserialize, Serialize};

/// One hotel, keyed by `link`.
///
/// The first nine fields come from the search results page; the last three
/// are filled in by the detail stage and stay `None` when the hotel page
/// could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub price: Option<f64>,
    /// Metres from the searched destination.
    pub distance: Option<f64>,
    pub rate_review: Option<f64>,
    pub num_review: Option<u32>,
    #[serde(default)]
    pub rating_stars: u32,
    pub link: String,
    pub source_url: String,

    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub hotel_type: Option<String>,
}

impl HotelRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    pub fn is_geocoded(&self) -> bool {
        self.coordinates().is_some()
    }

    /// Copy the detail-stage fields onto this record.
    pub fn apply_detail(&mut self, detail: &HotelDetail) {
        self.hotel_type = detail.hotel_type.clone();
        self.latitude = detail.latitude;
        self.longitude = detail.longitude;
    }
}

/// Borrowed view of the listing-stage columns, used when writing the raw
/// listing table so it carries no enrichment columns yet.
#[derive(Debug, Serialize)]
pub struct ListingRow<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub price: Option<f64>,
    pub distance: Option<f64>,
    pub rate_review: Option<f64>,
    pub num_review: Option<u32>,
    pub rating_stars: u32,
    pub link: &'a str,
    pub source_url: &'a str,
}

impl<'a> From<&'a HotelRecord> for ListingRow<'a> {
    fn from(r: &'a HotelRecord) -> Self {
        Self {
            name: r.name.as_deref(),
            address: r.address.as_deref(),
            price: r.price,
            distance: r.distance,
            rate_review: r.rate_review,
            num_review: r.num_review,
            rating_stars: r.rating_stars,
            link: &r.link,
            source_url: &r.source_url,
        }
    }
}

/// Fields parsed from a hotel's own page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelDetail {
    /// Final URL of the fetched page; matched against `HotelRecord::link`.
    pub link: String,
    pub hotel_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Column names of the persisted table, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    Address,
    Price,
    Distance,
    RateReview,
    NumReview,
    RatingStars,
    Link,
    SourceUrl,
    Latitude,
    Longitude,
    HotelType,
}

impl Column {
    pub const LISTING: [Column; 9] = [
        Column::Name,
        Column::Address,
        Column::Price,
        Column::Distance,
        Column::RateReview,
        Column::NumReview,
        Column::RatingStars,
        Column::Link,
        Column::SourceUrl,
    ];

    pub const DETAIL: [Column; 3] = [Column::Latitude, Column::Longitude, Column::HotelType];

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Address => "address",
            Column::Price => "price",
            Column::Distance => "distance",
            Column::RateReview => "rate_review",
            Column::NumReview => "num_review",
            Column::RatingStars => "rating_stars",
            Column::Link => "link",
            Column::SourceUrl => "source_url",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::HotelType => "hotel_type",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::LISTING
            .iter()
            .chain(Self::DETAIL.iter())
            .copied()
            .find(|c| c.as_str() == header.trim())
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_require_both_halves() {
        let mut record = HotelRecord {
            latitude: Some(52.2),
            ..Default::default()
        };
        assert!(!record.is_geocoded());

        record.longitude = Some(21.0);
        assert_eq!(record.coordinates(), Some((52.2, 21.0)));
    }

    #[test]
    fn headers_map_back_to_columns() {
        assert_eq!(Column::from_header("rate_review"), Some(Column::RateReview));
        assert_eq!(Column::from_header(" hotel_type "), Some(Column::HotelType));
        assert_eq!(Column::from_header("price_range"), None);
    }
}
