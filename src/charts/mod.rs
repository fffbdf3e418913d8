//! Server-rendered SVG charts for the trends view.
//!
//! Every chart takes the loaded dataset and a palette and returns either the
//! markup or the columns it would need, so a file missing those columns
//! shows an error in place of that one chart.

mod histogram;
mod scale;
mod scatter;
mod scatter3d;
mod treemap;

pub use histogram::{bin_counts, histogram, Bin, HISTOGRAM_BINS};
pub use scale::{extent, format_tick, LinearScale};
pub use scatter::scatter;
pub use scatter3d::{project, scatter3d, Projected};
pub use treemap::{layout_treemap, treemap, Tile};

use crate::theme::Palette;
use maud::{html, Markup};

pub const WIDTH: f64 = 560.0;
pub const HEIGHT: f64 = 380.0;

/// Plot area inside the frame, leaving room for the title and axis labels.
pub const PLOT_LEFT: f64 = 64.0;
pub const PLOT_RIGHT: f64 = WIDTH - 20.0;
pub const PLOT_TOP: f64 = 40.0;
pub const PLOT_BOTTOM: f64 = HEIGHT - 48.0;

fn px(v: f64) -> String {
    format!("{v:.1}")
}

fn frame(title: &str, palette: &Palette, body: Markup) -> Markup {
    html! {
        figure class="chart" {
            svg xmlns="http://www.w3.org/2000/svg"
                viewBox=(format!("0 0 {WIDTH} {HEIGHT}"))
                role="img"
                aria-label=(title)
            {
                text class="title" x="12" y="24" fill=(palette.title.to_string()) { (title) }
                (body)
            }
        }
    }
}

fn axes(x: &LinearScale, y: &LinearScale, x_label: &str, y_label: &str, palette: &Palette) -> Markup {
    let ink = palette.text.to_string();
    html! {
        g class="axes" stroke=(ink) {
            line x1=(px(PLOT_LEFT)) y1=(px(PLOT_BOTTOM)) x2=(px(PLOT_RIGHT)) y2=(px(PLOT_BOTTOM)) {}
            line x1=(px(PLOT_LEFT)) y1=(px(PLOT_TOP)) x2=(px(PLOT_LEFT)) y2=(px(PLOT_BOTTOM)) {}
        }
        g class="ticks" fill=(ink) {
            @for t in x.ticks(4) {
                text x=(px(x.map(t))) y=(px(PLOT_BOTTOM + 16.0)) text-anchor="middle" { (format_tick(t)) }
            }
            @for t in y.ticks(4) {
                text x=(px(PLOT_LEFT - 6.0)) y=(px(y.map(t) + 4.0)) text-anchor="end" { (format_tick(t)) }
            }
            text x=(px((PLOT_LEFT + PLOT_RIGHT) / 2.0)) y=(px(HEIGHT - 8.0)) text-anchor="middle" { (x_label) }
            text x="14" y=(px((PLOT_TOP + PLOT_BOTTOM) / 2.0)) text-anchor="middle"
                transform=(format!("rotate(-90 14 {})", px((PLOT_TOP + PLOT_BOTTOM) / 2.0)))
            { (y_label) }
        }
    }
}

fn no_data(palette: &Palette) -> Markup {
    html! {
        text x=(px(WIDTH / 2.0)) y=(px(HEIGHT / 2.0)) text-anchor="middle" fill=(palette.text.to_string()) {
            "nothing to plot yet"
        }
    }
}
