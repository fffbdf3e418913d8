use crate::domain::{HotelRecord, Spread};
use maud::{html, Markup};

/// Headline number with its min/max underneath.
pub fn metric_card(label: &str, spread: Option<Spread>, unit: &str) -> Markup {
    html! {
        div class="metric" {
            div class="label" { (label) }
            @match spread {
                Some(s) => {
                    div class="value" { (format!("{:.2}", s.mean)) " " (unit) }
                    div class="range" {
                        "lowest " (format!("{:.2}", s.min)) " · highest " (format!("{:.2}", s.max))
                    }
                },
                None => div class="value" { "–" },
            }
        }
    }
}

pub fn count_card(label: &str, count: usize) -> Markup {
    html! {
        div class="metric" {
            div class="label" { (label) }
            div class="value" { (count) }
        }
    }
}

fn or_dash<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "–".to_string(), |v| v.to_string())
}

/// One entry of the top-5 list.
pub fn hotel_card(rank: usize, hotel: &HotelRecord) -> Markup {
    html! {
        article class="card" {
            strong { (rank) ". " (hotel.display_name()) }
            " "
            a href=(hotel.link) target="_blank" rel="noopener" { "visit the hotel" }
            dl {
                dt { "price" } dd { (or_dash(hotel.price)) " pln" }
                dt { "rating" } dd { (hotel.rating_stars) "/5 ☆" }
                dt { "review rate" } dd { (or_dash(hotel.rate_review)) " / 10" }
                dt { "distance to city center" } dd { (or_dash(hotel.distance)) " m" }
            }
        }
    }
}
