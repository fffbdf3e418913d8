use super::{axes, extent, frame, no_data, px, LinearScale, PLOT_BOTTOM, PLOT_LEFT, PLOT_RIGHT, PLOT_TOP};
use crate::domain::Metric;
use crate::table::{Dataset, MissingColumns};
use crate::theme::Palette;
use maud::{html, Markup};

const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 12.0;

/// `y` against `x`, one dot per hotel having both. Dot colour follows `y`
/// along the palette gradient and dot size grows with `x`.
pub fn scatter(data: &Dataset, x: Metric, y: Metric, palette: &Palette) -> Result<Markup, MissingColumns> {
    data.capabilities.require(&[x.column(), y.column()])?;

    let points: Vec<(&str, f64, f64)> = data
        .records
        .iter()
        .filter_map(|r| Some((r.display_name(), x.value(r)?, y.value(r)?)))
        .collect();

    let title = format!("{y} vs {x}");
    let (Some(xr), Some(yr)) = (
        extent(points.iter().map(|p| p.1)),
        extent(points.iter().map(|p| p.2)),
    ) else {
        return Ok(frame(&title, palette, no_data(palette)));
    };

    let sx = LinearScale::new(xr, (PLOT_LEFT + MAX_RADIUS, PLOT_RIGHT - MAX_RADIUS));
    let sy = LinearScale::new(yr, (PLOT_BOTTOM - MAX_RADIUS, PLOT_TOP + MAX_RADIUS));
    let size = LinearScale::new(xr, (MIN_RADIUS, MAX_RADIUS));

    Ok(frame(
        &title,
        palette,
        html! {
            (axes(&sx, &sy, x.as_str(), y.as_str(), palette))
            g class="points" fill-opacity="0.7" stroke="black" stroke-width="1" {
                @for (name, vx, vy) in &points {
                    circle cx=(px(sx.map(*vx))) cy=(px(sy.map(*vy))) r=(px(size.map(*vx)))
                        fill=(palette.scale(*vy, yr.0, yr.1).to_string())
                    {
                        title { (name) ": " (x.as_str()) " " (vx) ", " (y.as_str()) " " (vy) }
                    }
                }
            }
        },
    ))
}
