use super::{extent, frame, no_data, px, PLOT_BOTTOM, PLOT_LEFT, PLOT_RIGHT, PLOT_TOP};
use crate::domain::{Metric, PriceRange};
use crate::table::{Dataset, MissingColumns};
use crate::theme::Palette;
use maud::{html, Markup};
use std::collections::{BTreeMap, HashMap};

/// Height reserved at the top of each hotel-type tile for its label.
const HEADER: f64 = 18.0;
const UNKNOWN_TYPE: &str = "unknown";

/// One rectangle of the treemap. Hotel-type tiles have no parent; price
/// bucket tiles name their hotel type as parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub label: String,
    pub parent: Option<String>,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Summed price of the rows in the tile.
    pub value: f64,
    /// Price-weighted mean of the colour metric; `None` when no row has it.
    pub color_value: Option<f64>,
}

#[derive(Default)]
struct Acc {
    value: f64,
    weighted: f64,
    weight: f64,
}

impl Acc {
    fn add(&mut self, price: f64, color: Option<f64>) {
        self.value += price;
        if let Some(c) = color {
            self.weighted += c * price;
            self.weight += price;
        }
    }

    fn color(&self) -> Option<f64> {
        (self.weight > 0.0).then(|| self.weighted / self.weight)
    }
}

/// Slice-and-dice layout: hotel types split the area left to right by total
/// price, then each type's buckets split its tile top to bottom. Rows
/// without a positive price (and so without a bucket) are left out.
pub fn layout_treemap(data: &Dataset, color: Metric, area: (f64, f64, f64, f64)) -> Vec<Tile> {
    let mut groups: HashMap<String, (Acc, BTreeMap<PriceRange, Acc>)> = HashMap::new();

    for record in &data.records {
        let (Some(price), Some(range)) = (record.price.filter(|p| *p > 0.0), data.price_range(record)) else {
            continue;
        };
        let kind = record
            .hotel_type
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
        let c = color.value(record);

        let (total, buckets) = groups.entry(kind).or_default();
        total.add(price, c);
        buckets.entry(range).or_default().add(price, c);
    }

    let mut ordered: Vec<_> = groups.into_iter().collect();
    ordered.sort_by(|a, b| b.1 .0.value.total_cmp(&a.1 .0.value).then_with(|| a.0.cmp(&b.0)));

    let grand: f64 = ordered.iter().map(|(_, (t, _))| t.value).sum();
    if grand <= 0.0 {
        return Vec::new();
    }

    let (ax, ay, aw, ah) = area;
    let mut tiles = Vec::new();
    let mut x = ax;

    for (kind, (total, buckets)) in ordered {
        let w = aw * total.value / grand;
        tiles.push(Tile {
            label: kind.clone(),
            parent: None,
            x,
            y: ay,
            w,
            h: ah,
            value: total.value,
            color_value: total.color(),
        });

        let inner_h = (ah - HEADER).max(0.0);
        let mut y = ay + HEADER;
        for (range, acc) in buckets {
            let h = inner_h * acc.value / total.value;
            tiles.push(Tile {
                label: range.as_str().to_string(),
                parent: Some(kind.clone()),
                x,
                y,
                w,
                h,
                value: acc.value,
                color_value: acc.color(),
            });
            y += h;
        }
        x += w;
    }

    tiles
}

pub fn treemap(data: &Dataset, color: Metric, palette: &Palette) -> Result<Markup, MissingColumns> {
    data.capabilities.can_treemap()?;
    data.capabilities.require(&[color.column()])?;

    let area = (PLOT_LEFT - 40.0, PLOT_TOP, PLOT_RIGHT - PLOT_LEFT + 40.0, PLOT_BOTTOM - PLOT_TOP + 24.0);
    let tiles = layout_treemap(data, color, area);
    let title = format!("hotel type and price range, coloured by {color}");
    if tiles.is_empty() {
        return Ok(frame(&title, palette, no_data(palette)));
    }

    let leaves: Vec<&Tile> = tiles.iter().filter(|t| t.parent.is_some()).collect();
    let (lo, hi) = extent(leaves.iter().filter_map(|t| t.color_value)).unwrap_or((0.0, 1.0));
    let ink = palette.text.to_string();

    Ok(frame(
        &title,
        palette,
        html! {
            @for tile in tiles.iter().filter(|t| t.parent.is_none()) {
                g class="group" {
                    rect x=(px(tile.x)) y=(px(tile.y)) width=(px(tile.w)) height=(px(tile.h))
                        fill="none" stroke=(ink) stroke-width="1" {}
                    @if tile.w > 40.0 {
                        text x=(px(tile.x + 4.0)) y=(px(tile.y + 13.0)) fill=(ink) { (tile.label) }
                    }
                }
            }
            @for tile in &leaves {
                @let fill = tile.color_value.map_or(palette.middle, |c| palette.scale(c, lo, hi));
                rect x=(px(tile.x + 1.0)) y=(px(tile.y + 1.0))
                    width=(px((tile.w - 2.0).max(0.0))) height=(px((tile.h - 2.0).max(0.0)))
                    fill=(fill.to_string())
                {
                    title {
                        (tile.parent.as_deref().unwrap_or_default()) " / " (tile.label)
                        ": price " (px(tile.value))
                        @if let Some(c) = tile.color_value { ", " (color.as_str()) " " (px(c)) }
                    }
                }
                @if tile.w > 50.0 && tile.h > 16.0 {
                    text x=(px(tile.x + 4.0)) y=(px(tile.y + 14.0)) fill=(ink) { (tile.label) }
                }
            }
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, HotelRecord};
    use crate::table::Capabilities;
    use crate::theme::{Mode, Theme};

    fn row(kind: Option<&str>, price: Option<f64>, reviews: Option<u32>) -> HotelRecord {
        HotelRecord {
            hotel_type: kind.map(String::from),
            price,
            num_review: reviews,
            ..Default::default()
        }
    }

    fn dataset(records: Vec<HotelRecord>) -> Dataset {
        Dataset {
            records,
            capabilities: Capabilities::new(Column::LISTING.into_iter().chain(Column::DETAIL)),
            nights: 1,
        }
    }

    const AREA: (f64, f64, f64, f64) = (0.0, 0.0, 400.0, 218.0);

    #[test]
    fn widths_follow_total_price() {
        let data = dataset(vec![
            row(Some("Hotel"), Some(100.0), Some(10)),
            row(Some("Hotel"), Some(200.0), Some(40)),
            row(Some("Apartment"), Some(100.0), Some(5)),
        ]);
        let tiles = layout_treemap(&data, Metric::NumReview, AREA);

        let hotel = tiles.iter().find(|t| t.label == "Hotel").unwrap();
        let apartment = tiles.iter().find(|t| t.label == "Apartment").unwrap();
        assert_eq!(hotel.w, 300.0);
        assert_eq!(apartment.w, 100.0);
        assert_eq!(hotel.x, 0.0);
        assert_eq!(apartment.x, 300.0);
        // (10 * 100 + 40 * 200) / 300
        assert_eq!(hotel.color_value, Some(30.0));
    }

    #[test]
    fn buckets_stack_inside_their_type() {
        let data = dataset(vec![
            row(Some("Hotel"), Some(100.0), None),
            row(Some("Hotel"), Some(300.0), None),
        ]);
        let tiles = layout_treemap(&data, Metric::NumReview, AREA);
        let leaves: Vec<_> = tiles.iter().filter(|t| t.parent.is_some()).collect();

        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].label, "cheap");
        assert_eq!(leaves[1].label, "expensive");
        assert_eq!(leaves[0].y, HEADER);
        assert_eq!(leaves[0].h, 50.0);
        assert_eq!(leaves[1].h, 150.0);
        assert!(leaves.iter().all(|t| t.color_value.is_none()));
    }

    #[test]
    fn unpriced_rows_are_left_out_and_missing_type_is_unknown() {
        let data = dataset(vec![row(None, Some(50.0), None), row(Some("Hostel"), None, None)]);
        let tiles = layout_treemap(&data, Metric::RateReview, AREA);
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].label, UNKNOWN_TYPE);
    }

    #[test]
    fn listing_only_table_cannot_draw_treemap() {
        let data = Dataset {
            capabilities: Capabilities::new(Column::LISTING),
            ..dataset(vec![])
        };
        let palette = Theme::builtin().palette(Mode::Light);
        let err = treemap(&data, Metric::NumReview, &palette).unwrap_err();
        assert_eq!(err, MissingColumns(vec![Column::HotelType]));
    }
}
