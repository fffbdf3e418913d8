use std::collections::HashSet;

use crate::domain::HotelRecord;

/// Drop rows whose `link` was already seen, keeping the first.
pub fn dedup_by_link(records: Vec<HotelRecord>) -> Vec<HotelRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.link.clone()))
        .collect()
}

/// Drop geocoded rows whose (latitude, longitude) pair was already seen.
///
/// This can merge distinct hotels that share a pin. Rows without
/// coordinates are always kept; they never collapse into one another.
pub fn dedup_by_coordinates(records: Vec<HotelRecord>) -> Vec<HotelRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| match r.coordinates() {
            Some((lat, lon)) => seen.insert((lat.to_bits(), lon.to_bits())),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(link: &str, coords: Option<(f64, f64)>) -> HotelRecord {
        HotelRecord {
            link: link.to_string(),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            ..Default::default()
        }
    }

    #[test]
    fn links_are_unique_after_dedup() {
        let rows = vec![at("a", None), at("b", None), at("a", None), at("c", None), at("b", None)];
        let out = dedup_by_link(rows);
        let links: Vec<_> = out.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, ["a", "b", "c"]);
    }

    #[test]
    fn shared_pins_collapse_but_ungeocoded_rows_survive() {
        let rows = vec![
            at("a", Some((50.06, 19.94))),
            at("b", None),
            at("c", Some((50.06, 19.94))),
            at("d", None),
            at("e", Some((50.07, 19.94))),
        ];
        let out = dedup_by_coordinates(rows);
        let links: Vec<_> = out.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, ["a", "b", "d", "e"]);
    }
}
