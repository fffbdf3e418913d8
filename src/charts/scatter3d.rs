use super::{extent, format_tick, frame, no_data, px, LinearScale, HEIGHT, WIDTH};
use crate::domain::Metric;
use crate::table::{Dataset, MissingColumns};
use crate::theme::Palette;
use maud::{html, Markup};

/// View angles in radians: rotation about the vertical axis, then tilt.
const AZIMUTH: f64 = 0.75;
const ELEVATION: f64 = 0.45;
const CUBE_PX: f64 = 190.0;
const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 9.0;

/// A point of the unit cube after rotation, in screen units centred on 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub sx: f64,
    pub sy: f64,
    /// Larger is closer to the viewer.
    pub depth: f64,
}

/// Orthographic projection of `p` (each coordinate in 0..=1, z up).
pub fn project(p: (f64, f64, f64), azimuth: f64, elevation: f64) -> Projected {
    let (x, y, z) = (p.0 - 0.5, p.1 - 0.5, p.2 - 0.5);
    let (sa, ca) = azimuth.sin_cos();
    let (se, ce) = elevation.sin_cos();

    let xr = x * ca - y * sa;
    let yr = x * sa + y * ca;

    Projected {
        sx: xr,
        sy: z * ce - yr * se,
        depth: -(yr * ce) - z * se,
    }
}

fn to_screen(p: Projected) -> (f64, f64) {
    (WIDTH / 2.0 + p.sx * CUBE_PX, HEIGHT / 2.0 + 12.0 - p.sy * CUBE_PX)
}

const CUBE_EDGES: [((f64, f64, f64), (f64, f64, f64)); 12] = [
    ((0.0, 0.0, 0.0), (1.0, 0.0, 0.0)),
    ((0.0, 1.0, 0.0), (1.0, 1.0, 0.0)),
    ((0.0, 0.0, 1.0), (1.0, 0.0, 1.0)),
    ((0.0, 1.0, 1.0), (1.0, 1.0, 1.0)),
    ((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
    ((1.0, 0.0, 0.0), (1.0, 1.0, 0.0)),
    ((0.0, 0.0, 1.0), (0.0, 1.0, 1.0)),
    ((1.0, 0.0, 1.0), (1.0, 1.0, 1.0)),
    ((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)),
    ((1.0, 0.0, 0.0), (1.0, 0.0, 1.0)),
    ((0.0, 1.0, 0.0), (0.0, 1.0, 1.0)),
    ((1.0, 1.0, 0.0), (1.0, 1.0, 1.0)),
];

/// Three metrics on a rotated cube, dots sized by `x`, coloured by `z` and
/// painted back to front.
pub fn scatter3d(
    data: &Dataset,
    x: Metric,
    y: Metric,
    z: Metric,
    palette: &Palette,
) -> Result<Markup, MissingColumns> {
    data.capabilities.require(&[x.column(), y.column(), z.column()])?;

    let rows: Vec<(&str, f64, f64, f64)> = data
        .records
        .iter()
        .filter_map(|r| Some((r.display_name(), x.value(r)?, y.value(r)?, z.value(r)?)))
        .collect();

    let title = format!("{x} / {y} / {z}");
    let (Some(xr), Some(yr), Some(zr)) = (
        extent(rows.iter().map(|r| r.1)),
        extent(rows.iter().map(|r| r.2)),
        extent(rows.iter().map(|r| r.3)),
    ) else {
        return Ok(frame(&title, palette, no_data(palette)));
    };

    let unit = |range: (f64, f64)| LinearScale::new(range, (0.0, 1.0));
    let (ux, uy, uz) = (unit(xr), unit(yr), unit(zr));
    let size = LinearScale::new(xr, (MIN_RADIUS, MAX_RADIUS));

    let mut dots: Vec<(Projected, &str, f64, f64)> = rows
        .iter()
        .map(|(name, vx, vy, vz)| {
            (
                project((ux.map(*vx), uy.map(*vy), uz.map(*vz)), AZIMUTH, ELEVATION),
                *name,
                size.map(*vx),
                *vz,
            )
        })
        .collect();
    dots.sort_by(|a, b| a.0.depth.total_cmp(&b.0.depth));

    let ink = palette.text.to_string();
    let edge = |a, b| (to_screen(project(a, AZIMUTH, ELEVATION)), to_screen(project(b, AZIMUTH, ELEVATION)));
    let axis_label = |p, label: String| {
        let (lx, ly) = to_screen(project(p, AZIMUTH, ELEVATION));
        (lx, ly, label)
    };
    let labels = [
        axis_label((1.1, 0.0, 0.0), format!("{x} {}–{}", format_tick(xr.0), format_tick(xr.1))),
        axis_label((0.0, 1.1, 0.0), format!("{y} {}–{}", format_tick(yr.0), format_tick(yr.1))),
        axis_label((0.0, 0.0, 1.1), format!("{z} {}–{}", format_tick(zr.0), format_tick(zr.1))),
    ];

    Ok(frame(
        &title,
        palette,
        html! {
            g class="cube" stroke=(ink) stroke-opacity="0.35" {
                @for (a, b) in CUBE_EDGES {
                    @let ((x1, y1), (x2, y2)) = edge(a, b);
                    line x1=(px(x1)) y1=(px(y1)) x2=(px(x2)) y2=(px(y2)) {}
                }
            }
            g class="ticks" fill=(ink) {
                @for (lx, ly, label) in &labels {
                    text x=(px(*lx)) y=(px(*ly)) text-anchor="middle" { (label) }
                }
            }
            g class="points" stroke="black" stroke-width="0.5" fill-opacity="0.85" {
                @for (p, name, r, vz) in &dots {
                    @let (cx, cy) = to_screen(*p);
                    circle cx=(px(cx)) cy=(px(cy)) r=(px(*r))
                        fill=(palette.scale(*vz, zr.0, zr.1).to_string())
                    {
                        title { (name) }
                    }
                }
            }
        },
    ))
}
