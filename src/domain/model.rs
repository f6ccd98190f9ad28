use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
pub const LNG_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A validated latitude/longitude pair in degrees.
///
/// The fields are private so that every value in circulation went through
/// [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if lat.is_finite() && lng.is_finite() && LAT_RANGE.contains(&lat) && LNG_RANGE.contains(&lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "price_as_text")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub map: String,
    #[serde(default)]
    pub external_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Store ids come back either as integers or as uuid strings.
fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

/// Prices are stored as text, but older rows may hold a number or null.
fn price_as_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The editable part of a venue, as sent on insert and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueDraft {
    pub region: String,
    pub name: String,
    pub price: String,
    pub comment: String,
    pub map: String,
    pub external_link: Option<String>,
}

impl From<&Venue> for VenueDraft {
    fn from(venue: &Venue) -> Self {
        Self {
            region: venue.region.clone(),
            name: venue.name.clone(),
            price: venue.price.clone(),
            comment: venue.comment.clone(),
            map: venue.map.clone(),
            external_link: venue.external_link.clone(),
        }
    }
}

/// Semantic venue fields a table column can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Region,
    Name,
    Price,
    Comment,
    Map,
    ExternalLink,
    CreatedAt,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Region,
        Field::Name,
        Field::Price,
        Field::Comment,
        Field::Map,
        Field::ExternalLink,
        Field::CreatedAt,
    ];

    /// Column name in the venue store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Region => "region",
            Field::Name => "name",
            Field::Price => "price",
            Field::Comment => "comment",
            Field::Map => "map",
            Field::ExternalLink => "external_link",
            Field::CreatedAt => "created_at",
        }
    }

    pub fn value_of(&self, venue: &Venue) -> CellValue {
        match self {
            Field::Region => CellValue::text(&venue.region),
            Field::Name => CellValue::text(&venue.name),
            Field::Price => match venue.price.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => CellValue::Number(n),
                _ => CellValue::text(&venue.price),
            },
            Field::Comment => CellValue::text(&venue.comment),
            Field::Map => CellValue::text(&venue.map),
            Field::ExternalLink => venue
                .external_link
                .as_deref()
                .map(CellValue::text)
                .unwrap_or(CellValue::None),
            Field::CreatedAt => CellValue::Number(venue.created_at.timestamp_millis() as f64),
        }
    }

    /// The field as shown in a plain cell.
    pub fn display(&self, venue: &Venue) -> String {
        match self {
            Field::Region => venue.region.clone(),
            Field::Name => venue.name.clone(),
            Field::Price => venue.price.clone(),
            Field::Comment => venue.comment.clone(),
            Field::Map => venue.map.clone(),
            Field::ExternalLink => venue.external_link.clone().unwrap_or_default(),
            Field::CreatedAt => venue.created_at.format("%B %-d, %Y").to_string(),
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown field '{}', expected one of: {}",
                    s,
                    Field::ALL.map(|f| f.as_str()).join(", ")
                )
            })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comparable view of a single venue field.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    None,
}

impl CellValue {
    fn text(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective {
    pub column: Field,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn ascending(column: Field) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Same column flips the direction, another column starts ascending.
    pub fn toggle(current: Option<Self>, column: Field) -> Self {
        match current {
            Some(d) if d.column == column => Self {
                column,
                direction: d.direction.flipped(),
            },
            _ => Self::ascending(column),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: User,
}
