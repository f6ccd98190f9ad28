//! Turns the free-form map references stored on venues into coordinates.
//!
//! A reference is either a map-service URL or a bare `lat,lng` pair.
//! Resolution is purely syntactic: shortened links are not followed, and any
//! candidate that is out of range is dropped instead of returned.

use crate::domain::model::Coordinate;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

const SHORT_URL_MARKERS: [&str; 2] = ["goo.gl/maps/", "maps.app.goo.gl/"];

static PLACE_AT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)(?:,\d+\.?\d*z)?").unwrap());

/// Alternate encodings, tried in this order after the `@lat,lng` segment.
static ALTERNATE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("ll", r"ll=(-?\d+\.\d+),(-?\d+\.\d+)"),
        ("query", r"q=(-?\d+\.\d+),(-?\d+\.\d+)"),
        ("place_query", r"\?q=(-?\d+\.\d+),(-?\d+\.\d+)"),
        ("embed", r"!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)"),
        ("data", r"!8m2!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

static BARE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*,\s*([+-]?\d+(?:\.\d+)?)\s*$").unwrap()
});

static PLACE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/maps/place/([^/@?]+)").unwrap());

/// A resolved reference, with the place name when the URL carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct MapReference {
    pub coordinate: Coordinate,
    pub place_name: Option<String>,
}

pub fn is_short_url(reference: &str) -> bool {
    SHORT_URL_MARKERS.iter().any(|m| reference.contains(m))
}

/// True when the reference points at a map service, resolvable or not.
pub fn looks_like_map_url(reference: &str) -> bool {
    reference.contains("google.com/maps") || reference.contains("maps.google.") || is_short_url(reference)
}

/// Extracts a coordinate from a map reference, or `None` when no valid pair
/// can be found without a network hop.
pub fn resolve(reference: &str) -> Option<Coordinate> {
    if is_short_url(reference) {
        tracing::debug!("Short map URL cannot be resolved offline: {}", reference);
        return None;
    }

    if let Some(c) = first_valid_pair(&PLACE_AT, reference) {
        return Some(c);
    }

    for (name, pattern) in ALTERNATE_PATTERNS.iter() {
        if let Some(c) = first_valid_pair(pattern, reference) {
            tracing::trace!("Map reference matched the {} encoding", name);
            return Some(c);
        }
    }

    first_valid_pair(&BARE_PAIR, reference)
}

/// Like [`resolve`], also decoding the place name of `/maps/place/<name>/` URLs.
pub fn resolve_place(reference: &str) -> Option<MapReference> {
    let coordinate = resolve(reference)?;
    Some(MapReference {
        coordinate,
        place_name: place_name(reference),
    })
}

fn place_name(reference: &str) -> Option<String> {
    let raw = PLACE_NAME.captures(reference)?.get(1)?.as_str();
    if raw.starts_with("data=") {
        return None;
    }
    let decoded: String = url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| if v.is_empty() { k.into_owned() } else { format!("{}={}", k, v) })
        .collect::<Vec<_>>()
        .join("&");
    let decoded = decoded.trim();
    (!decoded.is_empty()).then(|| decoded.to_string())
}

// Only the leftmost match of a pattern is considered. An out-of-range pair
// makes the whole pattern a non-match.
fn first_valid_pair(pattern: &Regex, haystack: &str) -> Option<Coordinate> {
    let caps = pattern.captures(haystack)?;
    let lat = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let lng = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Coordinate::new(lat, lng)
}

impl FromStr for Coordinate {
    type Err = String;

    /// Parses a bare `lat,lng` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        first_valid_pair(&BARE_PAIR, s).ok_or_else(|| format!("'{}' is not a valid lat,lng pair", s))
    }
}
