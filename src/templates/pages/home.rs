// templates/pages/home.rs

use crate::domain::{top_n, Metric, SearchQuery, Summary, TOP_N};
use crate::map::{build_markers, center, markers_json};
use crate::session::{RunStatus, SessionContext};
use crate::templates::components::{count_card, hotel_card, metric_card, notice, Tone};
use chrono::{Days, NaiveDate};
use maud::{html, Markup, PreEscaped};
use std::collections::{HashMap, HashSet};

const MAP_JS: &str = include_str!("../../../assets/map.js");

/// Raw form values, echoed back when validation fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchForm {
    pub destination: String,
    pub checkin: String,
    pub checkout: String,
    pub adults: String,
}

impl SearchForm {
    /// Tonight, one night, two adults.
    pub fn defaults(today: NaiveDate) -> Self {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        Self {
            destination: String::new(),
            checkin: today.to_string(),
            checkout: tomorrow.to_string(),
            adults: "2".to_string(),
        }
    }

    pub fn from_query(q: &SearchQuery) -> Self {
        Self {
            destination: q.destination.clone(),
            checkin: q.checkin.to_string(),
            checkout: q.checkout.to_string(),
            adults: q.adults.to_string(),
        }
    }

    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |k: &str| fields.get(k).cloned().unwrap_or_default();
        Self {
            destination: get("destination"),
            checkin: get("checkin"),
            checkout: get("checkout"),
            adults: get("adults"),
        }
    }
}

pub struct HomeVm<'a> {
    pub session: &'a SessionContext,
    pub form: SearchForm,
    /// Validation message for the form, if the last submit was rejected.
    pub error: Option<String>,
    pub rank: Metric,
    pub top_only: bool,
    pub today: NaiveDate,
}

/// Leaflet stylesheet and script, needed only on this page.
pub fn map_head() -> Markup {
    html! {
        link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
        script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" {}
    }
}

pub fn home_page(vm: &HomeVm<'_>) -> Markup {
    html! {
        h2 { "search hotels" }
        (search_form(vm))

        @if let Some(err) = &vm.error {
            (notice(Tone::Error, err))
        }
        (run_status(vm.session))
        @if let Some(msg) = &vm.session.notice {
            (notice(Tone::Info, msg))
        }

        @if vm.session.dataset.is_empty() {
            @if !vm.session.status.is_running() {
                (notice(Tone::Info, "fill in the form to see the results."))
            }
        } @else {
            (results(vm))
        }
    }
}

fn search_form(vm: &HomeVm<'_>) -> Markup {
    let f = &vm.form;
    html! {
        form class="search" method="post" action="/search" {
            label {
                "where are we headed?"
                input type="text" name="destination" placeholder="destination" value=(f.destination);
            }
            label {
                "check-in"
                input type="date" name="checkin" min=(vm.today.to_string()) value=(f.checkin);
            }
            label {
                "check-out"
                input type="date" name="checkout" min=(vm.today.to_string()) value=(f.checkout);
            }
            label title="number of adults" {
                "adults"
                input type="number" name="adults" min="1" step="1" value=(f.adults);
            }
            button type="submit" disabled[vm.session.status.is_running()] { "find my stay" }
        }
    }
}

fn run_status(session: &SessionContext) -> Markup {
    html! {
        @match &session.status {
            RunStatus::Idle => {},
            RunStatus::Running { started_at } => {
                div class="notice" {
                    "scraping hotel data since " (started_at.format("%H:%M:%S UTC").to_string()) "... "
                    @if let Some(link) = &session.search_link {
                        a href=(link) target="_blank" rel="noopener" {
                            "while scraping you can explore booking.com by yourself."
                        }
                    }
                }
            },
            RunStatus::Finished { rows, .. } => {
                (notice(Tone::Info, &format!("...scraping completed! {rows} spots found.")))
            },
            RunStatus::Failed { reason } => {
                (notice(Tone::Error, &format!("oops! an error occurred during scraping: {reason}")))
            },
        }
    }
}

fn results(vm: &HomeVm<'_>) -> Markup {
    let data = &vm.session.dataset;
    let summary = Summary::from_records(&data.records);

    html! {
        @if let Some(q) = &vm.session.query {
            h2 {
                "your " em { (q.destination) } " experience awaits: "
                em { (q.checkin.to_string()) " – " (q.checkout.to_string()) } " for " em { (q.adults) } " guests"
            }
        }

        h3 { "quick hotel insights" }
        div class="metrics" {
            (count_card("no. of found spots", summary.count))
            (metric_card("avg. price", summary.price, "pln"))
            (metric_card("avg. rate review", summary.rate_review, ""))
            (metric_card("avg. distance to city center", summary.distance, "m"))
        }

        @match data.capabilities.can_map() {
            Ok(()) => (map_and_top(vm)),
            Err(e) => (notice(Tone::Error, &format!("missing required geographic data in results. {e}"))),
        }
    }
}

fn map_and_top(vm: &HomeVm<'_>) -> Markup {
    let data = &vm.session.dataset;
    let top = top_n(&data.records, vm.rank, TOP_N);
    let top_links: HashSet<&str> = top.iter().map(|r| r.link.as_str()).collect();
    let markers = build_markers(data, &top_links, vm.top_only);

    html! {
        div class="columns" {
            section {
                h3 { "show me top " (TOP_N) }
                form method="get" action="/" {
                    label title=(vm.rank.hint()) {
                        "referring to... "
                        select name="rank" {
                            @for m in Metric::ALL {
                                option value=(m.as_str()) selected[m == vm.rank] { (m.as_str()) }
                            }
                        }
                    }
                    label {
                        input type="checkbox" name="top_only" value="1" checked[vm.top_only];
                        " show only top " (TOP_N) " hotels on the map"
                    }
                    button type="submit" { "apply" }
                }

                @match (center(&markers), markers_json(&markers)) {
                    (Some((lat, lon)), Ok(json)) => {
                        div id="map" data-lat=(lat) data-lon=(lon) {}
                        script type="application/json" id="hotel-markers" { (PreEscaped(json)) }
                        script { (PreEscaped(MAP_JS)) }
                    },
                    (None, _) => (notice(Tone::Info, "none of the hotels has map coordinates yet.")),
                    (_, Err(e)) => (notice(Tone::Error, &format!("map could not be drawn: {e}"))),
                }
            }

            section {
                h4 { "top " (TOP_N) " hotels sorted by " (vm.rank.as_str()) ":" }
                p class="hint" { (vm.rank.hint()) }
                @if top.is_empty() {
                    p { "no hotel has a value for " (vm.rank.as_str()) "." }
                }
                @for (i, hotel) in top.iter().enumerate() {
                    (hotel_card(i + 1, hotel))
                }
            }
        }
    }
}
