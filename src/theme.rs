//! Light/dark palettes loaded from a Material-style theme file.
//!
//! The file looks like `{"schemes": {"light": {"primary": "#8D4A5B", ..},
//! "dark": {..}}}`. Only the colour names in [`REQUIRED_COLORS`] are
//! checked; any extra entries are carried into the style sheet as CSS
//! variables.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

const BUILTIN_JSON: &str = include_str!("../assets/theme.json");
const BASE_CSS: &str = include_str!("../assets/style.css");

static BUILTIN: LazyLock<Theme> =
    LazyLock::new(|| Theme::from_json(BUILTIN_JSON).expect("bundled theme is valid"));

/// Steps in the chart colour gradient.
pub const GRADIENT_STEPS: usize = 40;

/// Colours the dashboard reads by name.
pub const REQUIRED_COLORS: [&str; 12] = [
    "primary",
    "onPrimary",
    "secondary",
    "secondaryContainer",
    "onSecondaryContainer",
    "tertiary",
    "onTertiary",
    "tertiaryFixedDim",
    "surfaceContainer",
    "onSurface",
    "outlineVariant",
    "errorContainer",
];

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("cannot read theme file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("theme file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{mode} scheme is missing colour `{name}`")]
    MissingColor { mode: Mode, name: &'static str },

    #[error("colour `{name}` has invalid value {value:?}")]
    InvalidColor { name: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(raw: &str) -> Option<Rgb> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear blend; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// `steps` colours evenly spaced from `start` to `end`, both included.
pub fn gradient(start: Rgb, end: Rgb, steps: usize) -> Vec<Rgb> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..steps)
            .map(|i| start.lerp(end, i as f64 / (steps - 1) as f64))
            .collect(),
    }
}

/// Chart colours derived from one scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub gradient: Vec<Rgb>,
    pub middle: Rgb,
    pub title: Rgb,
    pub text: Rgb,
}

impl Palette {
    /// Colour for `value` positioned within `[min, max]` along the gradient.
    pub fn scale(&self, value: f64, min: f64, max: f64) -> Rgb {
        let Some(last) = self.gradient.len().checked_sub(1) else {
            return self.middle;
        };
        let t = if max > min { (value - min) / (max - min) } else { 0.5 };
        let idx = (t.clamp(0.0, 1.0) * last as f64).round() as usize;
        self.gradient[idx.min(last)]
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Schemes {
    light: BTreeMap<String, String>,
    dark: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ThemeFile {
    schemes: Schemes,
}

#[derive(Debug, Clone)]
pub struct Theme {
    light: BTreeMap<String, Rgb>,
    dark: BTreeMap<String, Rgb>,
}

impl Theme {
    pub fn from_json(json: &str) -> Result<Theme, ThemeError> {
        let file: ThemeFile = serde_json::from_str(json)?;
        Ok(Theme {
            light: parse_scheme(Mode::Light, file.schemes.light)?,
            dark: parse_scheme(Mode::Dark, file.schemes.dark)?,
        })
    }

    pub fn load(path: &Path) -> Result<Theme, ThemeError> {
        let json = fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Theme::from_json(&json)
    }

    /// Load `path`, falling back to the bundled palette on any error.
    pub fn load_or_default(path: &Path) -> Theme {
        Theme::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "theme not loaded, using bundled palette");
            Theme::builtin()
        })
    }

    pub fn builtin() -> Theme {
        BUILTIN.clone()
    }

    fn scheme(&self, mode: Mode) -> &BTreeMap<String, Rgb> {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }

    /// A colour by its Material name. Required colours are always present.
    pub fn color(&self, mode: Mode, name: &str) -> Rgb {
        self.scheme(mode)
            .get(name)
            .copied()
            .unwrap_or(Rgb(0x80, 0x80, 0x80))
    }

    pub fn palette(&self, mode: Mode) -> Palette {
        let gradient = gradient(
            self.color(mode, "onTertiary"),
            self.color(mode, "tertiaryFixedDim"),
            GRADIENT_STEPS,
        );
        let middle = gradient[gradient.len() / 2];

        Palette {
            gradient,
            middle,
            title: self.color(mode, "primary"),
            text: self.color(mode, "onSurface"),
        }
    }

    /// Every scheme colour as a `--kebab-case` CSS variable, followed by the
    /// page rules that use them.
    pub fn stylesheet(&self, mode: Mode) -> String {
        let vars: String = self
            .scheme(mode)
            .iter()
            .map(|(name, rgb)| format!("  --{}: {rgb};\n", kebab_case(name)))
            .collect();
        format!(":root {{\n{vars}}}\n{BASE_CSS}")
    }
}

fn parse_scheme(
    mode: Mode,
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<String, Rgb>, ThemeError> {
    if let Some(name) = REQUIRED_COLORS.iter().copied().find(|n| !raw.contains_key(*n)) {
        return Err(ThemeError::MissingColor { mode, name });
    }

    raw.into_iter()
        .map(|(name, value)| match Rgb::from_hex(&value) {
            Some(rgb) => Ok((name, rgb)),
            None => Err(ThemeError::InvalidColor { name, value }),
        })
        .collect()
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
