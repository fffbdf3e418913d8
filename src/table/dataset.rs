use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;

use crate::domain::{nightly_price, Column, HotelRecord, PriceRange};
use crate::table::store::{read_table, TableError};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("missing required columns: {}", .0.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", "))]
pub struct MissingColumns(pub Vec<Column>);

/// Which columns the loaded file actually carries. Computed once at load
/// time; each view asks it whether it can render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities {
    columns: BTreeSet<Column>,
}

impl Capabilities {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn require(&self, needed: &[Column]) -> Result<(), MissingColumns> {
        let missing: Vec<Column> = needed.iter().copied().filter(|c| !self.has(*c)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingColumns(missing))
        }
    }

    pub fn can_map(&self) -> Result<(), MissingColumns> {
        self.require(&[Column::Latitude, Column::Longitude])
    }

    pub fn can_treemap(&self) -> Result<(), MissingColumns> {
        self.require(&[Column::HotelType, Column::Price])
    }
}

/// The merged table as the dashboard sees it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<HotelRecord>,
    pub capabilities: Capabilities,
    /// Nights of the search, used to turn total prices into nightly ones.
    pub nights: u32,
}

impl Dataset {
    pub fn empty() -> Self {
        Self {
            nights: 1,
            ..Default::default()
        }
    }

    pub fn load(path: &Path, nights: u32) -> Result<Self, TableError> {
        let table = read_table(path)?;
        Ok(Self {
            records: table.records,
            capabilities: Capabilities::new(table.columns),
            nights: nights.max(1),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows that can be placed on the map.
    pub fn geocoded(&self) -> impl Iterator<Item = &HotelRecord> {
        self.records.iter().filter(|r| r.is_geocoded())
    }

    pub fn price_per_night(&self, record: &HotelRecord) -> Option<f64> {
        nightly_price(record.price, self.nights)
    }

    pub fn price_range(&self, record: &HotelRecord) -> Option<PriceRange> {
        PriceRange::from_nightly(self.price_per_night(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_only_table_cannot_map() {
        let caps = Capabilities::new(Column::LISTING);
        let err = caps.can_map().unwrap_err();
        assert_eq!(err.0, vec![Column::Latitude, Column::Longitude]);
        assert_eq!(err.to_string(), "missing required columns: latitude, longitude");
        assert!(caps.require(&[Column::Price, Column::Distance]).is_ok());
    }

    #[test]
    fn enriched_table_supports_every_view() {
        let caps = Capabilities::new(Column::LISTING.into_iter().chain(Column::DETAIL));
        assert!(caps.can_map().is_ok());
        assert!(caps.can_treemap().is_ok());
    }

    #[test]
    fn price_range_uses_the_night_count() {
        let dataset = Dataset {
            nights: 2,
            ..Dataset::empty()
        };
        let record = HotelRecord {
            price: Some(300.0),
            ..Default::default()
        };
        assert_eq!(dataset.price_range(&record), Some(PriceRange::Moderate));
    }

    #[test]
    fn loaded_table_buckets_by_the_given_nights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotels.csv");
        let record = HotelRecord {
            price: Some(600.0),
            link: "https://b.com/h1".into(),
            ..Default::default()
        };
        crate::table::write_listing_table(&path, std::slice::from_ref(&record)).unwrap();

        let single = Dataset::load(&path, 1).unwrap();
        assert_eq!(single.price_range(&single.records[0]), Some(PriceRange::Luxury));

        let week = Dataset::load(&path, 4).unwrap();
        assert_eq!(week.price_range(&week.records[0]), Some(PriceRange::Moderate));

        assert_eq!(Dataset::load(&path, 0).unwrap().nights, 1);
    }

    #[test]
    fn only_rows_with_both_coordinates_are_geocoded() {
        let dataset = Dataset {
            records: vec![
                HotelRecord {
                    link: "a".into(),
                    latitude: Some(1.0),
                    longitude: Some(2.0),
                    ..Default::default()
                },
                HotelRecord {
                    link: "b".into(),
                    ..Default::default()
                },
            ],
            ..Dataset::empty()
        };
        let links: Vec<_> = dataset.geocoded().map(|r| r.link.as_str()).collect();
        assert_eq!(links, ["a"]);
        assert_eq!(dataset.records.len(), 2);
    }
}
