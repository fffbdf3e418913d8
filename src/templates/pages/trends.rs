use crate::charts::{histogram, scatter, scatter3d, treemap};
use crate::domain::{Metric, PriceRange};
use crate::table::{Dataset, MissingColumns};
use crate::templates::components::{notice, Tone};
use crate::theme::Palette;
use maud::{html, Markup};

/// Axis and colour choices of the trends view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartChoice {
    pub x: Metric,
    pub y: Metric,
    pub x3: Metric,
    pub y3: Metric,
    pub z3: Metric,
    pub color: Metric,
}

impl Default for ChartChoice {
    fn default() -> Self {
        Self {
            x: Metric::Distance,
            y: Metric::Price,
            x3: Metric::Distance,
            y3: Metric::RateReview,
            z3: Metric::RatingStars,
            color: Metric::NumReview,
        }
    }
}

pub struct TrendsVm<'a> {
    pub dataset: &'a Dataset,
    pub choice: ChartChoice,
    pub palette: &'a Palette,
}

fn or_error(chart: Result<Markup, MissingColumns>) -> Markup {
    match chart {
        Ok(svg) => svg,
        Err(e) => notice(Tone::Error, &format!("selected columns are not in the data: {e}")),
    }
}

fn metric_select(name: &str, label: &str, options: &[Metric], current: Metric) -> Markup {
    html! {
        label {
            (label) " "
            select name=(name) {
                @for m in options {
                    option value=(m.as_str()) selected[*m == current] { (m.as_str()) }
                }
            }
        }
    }
}

pub fn trends_page(vm: &TrendsVm<'_>) -> Markup {
    let c = vm.choice;

    html! {
        @if vm.dataset.is_empty() {
            (notice(Tone::Info, "fill in the form to see the results."))
        } @else {
            form method="get" action="/trends" class="search" {
                (metric_select("x", "select X-axis", &Metric::ALL, c.x))
                (metric_select("y", "select Y-axis", &Metric::ALL, c.y))
                (metric_select("color", "treemap colour by", &Metric::TREEMAP_COLORS, c.color))
                (metric_select("x3", "3D X-axis", &Metric::ALL, c.x3))
                (metric_select("y3", "3D Y-axis", &Metric::ALL, c.y3))
                (metric_select("z3", "3D Z-axis", &Metric::ALL, c.z3))
                button type="submit" { "redraw" }
            }

            h3 { "customizable scatter plot" }
            div class="charts" {
                (or_error(scatter(vm.dataset, c.x, c.y, vm.palette)))
                div {
                    (or_error(histogram(vm.dataset, c.x, vm.palette)))
                    (or_error(histogram(vm.dataset, c.y, vm.palette)))
                }
            }

            h3 { "treemap: hotel distribution by price range and " (c.color.as_str()) }
            div class="charts" {
                (or_error(treemap(vm.dataset, c.color, vm.palette)))
                (price_legend())
            }

            h3 { "3D view" }
            (or_error(scatter3d(vm.dataset, c.x3, c.y3, c.z3, vm.palette)))
        }
    }
}

pub fn price_legend() -> Markup {
    html! {
        section class="legend" {
            h4 { "price categories description:" }
            ul {
                @for range in PriceRange::ALL {
                    li { strong { (range.as_str()) } ": " (range.description()) }
                }
            }
        }
    }
}
