//! Text normalisation for fields scraped off listing cards and hotel pages.
//!
//! Every function returns `None` for input it cannot make sense of; nothing
//! here panics on odd markup.

use regex::Regex;
use std::sync::LazyLock;

static PAREN_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*([^,()]+?)\s*[,)]").expect("valid regex"));

/// Collapse runs of whitespace (including non-breaking spaces) into one space.
pub fn clean_text(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '\u{a0}' || c == '\u{202f}')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a price such as `"1 234 zł"`, `"zł 1.234"` or `"99,50 zł"`.
///
/// Currency text and grouping spaces are dropped. A single `.` or `,`
/// followed by one or two digits is a decimal point; otherwise it groups
/// thousands.
pub fn parse_price(raw: &str) -> Option<f64> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let kept = kept.trim_matches(|c| c == '.' || c == ',');
    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();

    let normalized = match kept.rfind(['.', ',']) {
        Some(pos) => {
            let (int_part, frac_part) = (&kept[..pos], &kept[pos + 1..]);
            let mixed = kept.contains('.') && kept.contains(',');
            let single = kept.matches(['.', ',']).count() == 1;
            let is_decimal = mixed || (single && (1..=2).contains(&frac_part.len()));
            if is_decimal {
                format!("{}.{}", digits(int_part), frac_part)
            } else {
                digits(kept)
            }
        }
        None => kept.to_string(),
    };

    normalized.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Parse `"1,2 km"` / `"350 m od centrum"` into metres.
/// A value without a recognised unit is `None`.
pub fn parse_distance(raw: &str) -> Option<f64> {
    let text = clean_text(raw).replace(',', ".");
    let mut tokens = text.split(' ');
    let first = tokens.next()?;

    let split_at = first
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(first.len());
    let (number, glued_unit) = first.split_at(split_at);
    let value = number.parse::<f64>().ok()?;

    let unit = if glued_unit.is_empty() {
        tokens.next()?
    } else {
        glued_unit
    };

    match unit.to_lowercase().as_str() {
        "km" => Some(value * 1000.0),
        "m" => Some(value),
        _ => None,
    }
}

fn score(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=10.0).contains(v))
}

/// A label like `"Scored 8.6"` or `"Ocena 8,6"`: ends in a score.
fn is_score_label(node: &str) -> bool {
    node.split_whitespace().last().and_then(score).is_some()
}

/// Review score from the text nodes of a card's review block: the first
/// node that is a bare number in 0–10, falling back to the last word of a
/// node such as `"Scored 8.6"`.
pub fn parse_rate_review<S: AsRef<str>>(nodes: &[S]) -> Option<f64> {
    nodes
        .iter()
        .find_map(|n| score(n.as_ref()))
        .or_else(|| {
            nodes
                .iter()
                .find_map(|n| n.as_ref().split_whitespace().last().and_then(score))
        })
}

/// Review count from the last text node mixing digits and words, e.g.
/// `"1 234 opinii"` → 1234. Score labels are not counts.
pub fn parse_review_count<S: AsRef<str>>(nodes: &[S]) -> Option<u32> {
    nodes
        .iter()
        .rev()
        .map(|n| n.as_ref())
        .filter(|n| !is_score_label(n))
        .find(|n| n.chars().any(|c| c.is_ascii_digit()) && n.chars().any(char::is_alphabetic))
        .and_then(|n| {
            n.chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .ok()
        })
}

/// First token inside parentheses of a breadcrumb such as
/// `"Hotels (Apartment, City)"`.
pub fn parse_hotel_type(breadcrumb: &str) -> Option<String> {
    PAREN_TOKEN_RE
        .captures(breadcrumb)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Split a `"lat,lon"` attribute into a coordinate pair.
pub fn parse_lat_lng(raw: &str) -> Option<(f64, f64)> {
    let (lat, lon) = raw.split_once(',')?;
    if lon.contains(',') {
        return None;
    }
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;

    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lat, lon))
}
