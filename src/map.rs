// map.rs
use crate::domain::HotelRecord;
use crate::table::Dataset;
use serde::Serialize;
use std::collections::HashSet;

pub const CHEAP_COLOR: &str = "#597700";
pub const MID_COLOR: &str = "#F2C824";
pub const EXPENSIVE_COLOR: &str = "#CC322F";
pub const TOP_COLOR: &str = "#FFD700";

/// Marker payload handed to the Leaflet script as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub price: Option<f64>,
    pub stars: u32,
    pub reviews: Option<u32>,
    pub address: Option<String>,
    pub link: String,
    pub color: &'static str,
    pub top: bool,
}

/// Colour by total price; a missing price counts as expensive.
pub fn marker_color(price: Option<f64>) -> &'static str {
    match price {
        Some(p) if p < 200.0 => CHEAP_COLOR,
        Some(p) if p < 500.0 => MID_COLOR,
        _ => EXPENSIVE_COLOR,
    }
}

/// One marker per geocoded row; rows in `top_links` turn gold. With
/// `only_top`, every other row is dropped.
pub fn build_markers(data: &Dataset, top_links: &HashSet<&str>, only_top: bool) -> Vec<MapMarker> {
    data.geocoded()
        .map(|r| (r, top_links.contains(r.link.as_str())))
        .filter(|(_, top)| !only_top || *top)
        .filter_map(|(r, top)| marker(r, top))
        .collect()
}

fn marker(r: &HotelRecord, top: bool) -> Option<MapMarker> {
    let (lat, lon) = r.coordinates()?;
    Some(MapMarker {
        lat,
        lon,
        name: r.display_name().to_string(),
        price: r.price,
        stars: r.rating_stars,
        reviews: r.num_review,
        address: r.address.clone(),
        link: r.link.clone(),
        color: if top { TOP_COLOR } else { marker_color(r.price) },
        top,
    })
}

/// Mean position of the markers.
pub fn center(markers: &[MapMarker]) -> Option<(f64, f64)> {
    if markers.is_empty() {
        return None;
    }
    let n = markers.len() as f64;
    let lat = markers.iter().map(|m| m.lat).sum::<f64>() / n;
    let lon = markers.iter().map(|m| m.lon).sum::<f64>() / n;
    Some((lat, lon))
}

/// JSON for embedding inside a `<script>` element.
pub fn markers_json(markers: &[MapMarker]) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(markers)?.replace("</", "<\\/"))
}
