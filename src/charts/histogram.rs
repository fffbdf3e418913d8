use super::{axes, extent, frame, no_data, px, LinearScale, PLOT_BOTTOM, PLOT_LEFT, PLOT_RIGHT, PLOT_TOP};
use crate::domain::Metric;
use crate::table::{Dataset, MissingColumns};
use crate::theme::Palette;
use maud::{html, Markup};

pub const HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width bins spanning the values. The last bin includes its upper
/// edge, so the maximum is always counted.
pub fn bin_counts(values: &[f64], bins: usize) -> Vec<Bin> {
    let Some((mut lo, mut hi)) = extent(values.iter().copied()) else {
        return Vec::new();
    };
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }

    let bins = bins.max(1);
    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for v in values.iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

pub fn histogram(data: &Dataset, metric: Metric, palette: &Palette) -> Result<Markup, MissingColumns> {
    data.capabilities.require(&[metric.column()])?;

    let values: Vec<f64> = data.records.iter().filter_map(|r| metric.value(r)).collect();
    let bins = bin_counts(&values, HISTOGRAM_BINS);
    let title = format!("distribution of {metric}");

    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(frame(&title, palette, no_data(palette)));
    };
    let tallest = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

    let sx = LinearScale::new((first.lo, last.hi), (PLOT_LEFT, PLOT_RIGHT));
    let sy = LinearScale::new((0.0, tallest.max(1.0)), (PLOT_BOTTOM, PLOT_TOP));
    let fill = palette.middle.to_string();

    Ok(frame(
        &title,
        palette,
        html! {
            (axes(&sx, &sy, metric.as_str(), "count", palette))
            g class="bars" fill=(fill) stroke="black" stroke-width="0.5" {
                @for bin in &bins {
                    @let top = sy.map(bin.count as f64);
                    rect x=(px(sx.map(bin.lo))) y=(px(top))
                        width=(px((sx.map(bin.hi) - sx.map(bin.lo) - 1.0).max(0.5)))
                        height=(px(PLOT_BOTTOM - top))
                    {
                        title { (bin.count) " rows in " (px(bin.lo)) "–" (px(bin.hi)) }
                    }
                }
            }
        },
    ))
}
