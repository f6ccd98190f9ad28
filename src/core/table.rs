//! Venue table: column binding, ordering and per-cell rendering decisions.

use crate::core::imagery::LocationImage;
use crate::core::maps;
use crate::domain::model::{CellValue, Coordinate, Field, SortDirection, SortDirective, Venue};
use crate::i18n::Language;
use std::cmp::Ordering;

/// How a column shows its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Text,
    Currency,
    MapLink,
    MapPreview,
    Image,
    ExternalLink,
    Actions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub field: Field,
    pub renderer: Renderer,
}

impl Column {
    pub fn new(label: impl Into<String>, field: Field, renderer: Renderer) -> Self {
        Self {
            label: label.into(),
            field,
            renderer,
        }
    }

    pub fn is_sortable(&self) -> bool {
        !matches!(self.renderer, Renderer::Actions | Renderer::Image | Renderer::MapPreview)
    }
}

/// The canonical venue table.
pub fn venue_columns(lang: Language) -> Vec<Column> {
    vec![
        Column::new(lang.t("venues.headers.region"), Field::Region, Renderer::Text),
        Column::new(lang.t("venues.headers.name"), Field::Name, Renderer::Text),
        Column::new(lang.t("venues.headers.price"), Field::Price, Renderer::Currency),
        Column::new(lang.t("venues.headers.comment"), Field::Comment, Renderer::Text),
        Column::new(lang.t("venues.headers.maps"), Field::Map, Renderer::MapLink),
        Column::new(lang.t("venues.headers.preview"), Field::Map, Renderer::MapPreview),
        Column::new(lang.t("venues.headers.image"), Field::Map, Renderer::Image),
        Column::new(lang.t("venues.headers.externalLink"), Field::ExternalLink, Renderer::ExternalLink),
        Column::new(lang.t("venues.headers.actions"), Field::Name, Renderer::Actions),
    ]
}

/// Positional header binding for callers that only have header labels.
///
/// Only the position of `column_label` inside `all_columns` matters, so
/// reordering the headers changes the bound field.
pub fn field_for_column<S: AsRef<str>>(column_label: &str, all_columns: &[S]) -> Field {
    match all_columns.iter().position(|c| c.as_ref() == column_label) {
        Some(0) => Field::Region,
        Some(1) => Field::Name,
        Some(2) => Field::Price,
        Some(3) => Field::Comment,
        Some(4..=6) => Field::Map,
        _ => Field::Name,
    }
}

/// Orders `rows` by the directive, keeping the input order for ties.
///
/// Numbers are ordered among numbers and texts among texts, each within the
/// positions their rows already occupy. A value with nothing comparable on
/// the other side (absent, or of the other kind) never moves.
pub fn sorted_rows<'a>(rows: &'a [Venue], directive: Option<SortDirective>) -> Vec<&'a Venue> {
    let mut out: Vec<&Venue> = rows.iter().collect();
    let Some(directive) = directive else {
        return out;
    };

    let values: Vec<CellValue> = rows.iter().map(|v| directive.column.value_of(v)).collect();
    let slots_of = |numeric: bool| -> Vec<usize> {
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| match v {
                CellValue::Number(_) => numeric,
                CellValue::Text(_) => !numeric,
                CellValue::None => false,
            })
            .map(|(i, _)| i)
            .collect()
    };

    for slots in [slots_of(true), slots_of(false)] {
        let mut order = slots.clone();
        order.sort_by(|&a, &b| {
            let ord = compare_values(&values[a], &values[b]);
            match directive.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        for (&slot, src) in slots.iter().zip(order) {
            out[slot] = &rows[src];
        }
    }

    out
}

/// Numbers by value, texts by locale order, anything else is a tie.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (CellValue::Text(x), CellValue::Text(y)) => locale_compare(x, y),
        _ => Ordering::Equal,
    }
}

/// Case- and accent-insensitive first, exact text as tie-breaker.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = fold(a).cmp(&fold(b));
    primary.then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(strip_accent).collect()
}

fn strip_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' | 'ś' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        'œ' => 'o',
        'æ' => 'a',
        other => other,
    }
}

const NARROW_NBSP: char = '\u{202F}';
const NBSP: char = '\u{00A0}';
/// Above this, cents no longer fit exactly in an `f64`.
const MAX_EXACT_AMOUNT: f64 = 1e13;

/// Formats a price the way `fr-FR` shows euros, e.g. `3 500,00 €`.
/// Text that is not a number is shown as zero; amounts too large to format
/// exactly keep their raw text.
pub fn format_price_eur(price: &str) -> String {
    let amount = price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0);
    if amount.abs() >= MAX_EXACT_AMOUNT {
        return format!("{}{}€", price.trim(), NBSP);
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    let (units, fraction) = (cents / 100, cents % 100);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(NARROW_NBSP);
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02}{}€", sign, grouped, fraction, NBSP)
}

/// What a single table cell shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Currency(String),
    MapLink { url: String },
    MiniMap {
        coordinate: Coordinate,
        place_name: Option<String>,
        url: String,
    },
    PreviewUnavailable { url: String },
    InvalidLocation,
    Image(LocationImage),
    Link { url: String },
    Actions { venue_id: String },
    Empty,
}

impl Cell {
    /// Single-line rendition for terminal output.
    pub fn plain_text(&self) -> String {
        match self {
            Cell::Text(s) | Cell::Currency(s) => s.clone(),
            Cell::MapLink { url } | Cell::Link { url } => url.clone(),
            Cell::MiniMap { coordinate, .. } => coordinate.to_string(),
            Cell::PreviewUnavailable { .. } => "-".to_string(),
            Cell::InvalidLocation => "!".to_string(),
            Cell::Image(image) => image.url().to_string(),
            Cell::Actions { venue_id } => venue_id.clone(),
            Cell::Empty => String::new(),
        }
    }
}

/// Decides what a cell shows. Never fails: bad data degrades to a link or a
/// placeholder for this cell only.
pub fn render_cell(column: &Column, venue: &Venue, image: Option<&LocationImage>) -> Cell {
    match column.renderer {
        Renderer::Text => Cell::Text(column.field.display(venue)),
        Renderer::Currency => Cell::Currency(format_price_eur(&column.field.display(venue))),
        Renderer::MapLink => {
            let url = column.field.display(venue);
            if url.trim().is_empty() {
                Cell::InvalidLocation
            } else {
                Cell::MapLink { url }
            }
        }
        Renderer::MapPreview => {
            let url = column.field.display(venue);
            if url.trim().is_empty() {
                return Cell::InvalidLocation;
            }
            match maps::resolve_place(&url) {
                Some(r) => Cell::MiniMap {
                    coordinate: r.coordinate,
                    place_name: r.place_name,
                    url,
                },
                None => {
                    tracing::debug!("No coordinate in map reference of venue {}", venue.id);
                    Cell::PreviewUnavailable { url }
                }
            }
        }
        Renderer::Image => image.cloned().map(Cell::Image).unwrap_or(Cell::Empty),
        Renderer::ExternalLink => match column.field.display(venue) {
            url if url.trim().is_empty() => Cell::Empty,
            url => Cell::Link { url },
        },
        Renderer::Actions => Cell::Actions {
            venue_id: venue.id.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn venue(id: &str, region: &str, name: &str, price: &str, map: &str) -> Venue {
        Venue {
            id: id.to_string(),
            region: region.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            comment: String::new(),
            map: map.to_string(),
            external_link: None,
            created_at: Utc.with_ymd_and_hms(2025, 5, 15, 10, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Venue> {
        vec![
            venue("1", "Paris", "Le Grand Hôtel", "5000", "48.8707312,2.3313381"),
            venue("2", "Lyon", "Château Vintage", "3500", ""),
            venue("3", "Bordeaux", "Domaine Viticole", "4200", "https://goo.gl/maps/x"),
        ]
    }

    fn ids(rows: &[&Venue]) -> Vec<String> {
        rows.iter().map(|v| v.id.clone()).collect()
    }

    #[test]
    fn test_sort_by_price_ascending() {
        let rows = sample();
        let sorted = sorted_rows(&rows, Some(SortDirective::ascending(Field::Price)));
        let prices: Vec<&str> = sorted.iter().map(|v| v.price.as_str()).collect();
        assert_eq!(prices, vec!["3500", "4200", "5000"]);
    }

    #[test]
    fn test_sort_by_price_descending() {
        let rows = sample();
        let directive = SortDirective::toggle(Some(SortDirective::ascending(Field::Price)), Field::Price);
        let sorted = sorted_rows(&rows, Some(directive));
        assert_eq!(ids(&sorted), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_prices_compare_numerically_not_lexically() {
        let rows = vec![
            venue("a", "", "", "900", ""),
            venue("b", "", "", "10000", ""),
            venue("c", "", "", "2500.5", ""),
        ];
        let sorted = sorted_rows(&rows, Some(SortDirective::ascending(Field::Price)));
        assert_eq!(ids(&sorted), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_text_sort_is_locale_ordered() {
        let rows = vec![
            venue("1", "", "domaine", "", ""),
            venue("2", "", "Élysée", "", ""),
            venue("3", "", "Abbaye", "", ""),
            venue("4", "", "château", "", ""),
        ];
        let sorted = sorted_rows(&rows, Some(SortDirective::ascending(Field::Name)));
        assert_eq!(ids(&sorted), vec!["3", "4", "1", "2"]);
    }

    #[test]
    fn test_sort_is_stable_and_mixed_kinds_stay_put() {
        let rows = vec![
            venue("1", "", "", "4000", ""),
            venue("2", "", "", "sur devis", ""),
            venue("3", "", "", "4000", ""),
            venue("4", "", "", "1000", ""),
        ];
        let sorted = sorted_rows(&rows, Some(SortDirective::ascending(Field::Price)));
        assert_eq!(ids(&sorted), vec!["4", "2", "1", "3"]);

        let desc = SortDirective {
            column: Field::Price,
            direction: SortDirection::Descending,
        };
        assert_eq!(ids(&sorted_rows(&rows, Some(desc))), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_absent_values_keep_their_position() {
        let mut rows = sample();
        rows[1].external_link = None;
        rows[0].external_link = Some("https://b.example".into());
        rows[2].external_link = Some("https://a.example".into());
        let sorted = sorted_rows(&rows, Some(SortDirective::ascending(Field::ExternalLink)));
        assert_eq!(ids(&sorted), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_no_directive_keeps_order() {
        let rows = sample();
        assert_eq!(ids(&sorted_rows(&rows, None)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_field_for_column_is_positional() {
        let headers = ["Lieux", "Endroit", "Prix", "Commentaire", "Maps", "Aperçu", "Image", "Lien"];
        assert_eq!(field_for_column("Lieux", &headers), Field::Region);
        assert_eq!(field_for_column("Prix", &headers), Field::Price);
        assert_eq!(field_for_column("Image", &headers), Field::Map);
        assert_eq!(field_for_column("Lien", &headers), Field::Name);
        assert_eq!(field_for_column("Unknown", &headers), Field::Name);

        let renamed = ["Region", "Name", "Price", "Comment", "Maps", "Preview", "Image", "Link"];
        for (a, b) in headers.iter().zip(renamed.iter()) {
            assert_eq!(field_for_column(a, &headers), field_for_column(b, &renamed));
        }
    }

    #[test]
    fn test_positional_binding_matches_canonical_columns() {
        let columns = venue_columns(Language::En);
        let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
        for column in columns.iter().take(7) {
            assert_eq!(field_for_column(&column.label, &labels), column.field);
        }
    }

    #[test]
    fn test_format_price_eur() {
        assert_eq!(format_price_eur("3500"), "3\u{202F}500,00\u{A0}€");
        assert_eq!(format_price_eur("1234567.891"), "1\u{202F}234\u{202F}567,89\u{A0}€");
        assert_eq!(format_price_eur("42"), "42,00\u{A0}€");
        assert_eq!(format_price_eur("-12.5"), "-12,50\u{A0}€");
        assert_eq!(format_price_eur(""), "0,00\u{A0}€");
        assert_eq!(format_price_eur("sur devis"), "0,00\u{A0}€");
    }

    #[test]
    fn test_huge_price_keeps_raw_text() {
        assert_eq!(format_price_eur("1e300"), "1e300\u{A0}€");
        assert_eq!(format_price_eur(" -2e20 "), "-2e20\u{A0}€");
        assert_eq!(
            format_price_eur("9999999999999"),
            "9\u{202F}999\u{202F}999\u{202F}999\u{202F}999,00\u{A0}€"
        );
    }

    #[test]
    fn test_render_map_cells() {
        let columns = venue_columns(Language::Fr);
        let link = &columns[4];
        let preview = &columns[5];
        let rows = sample();

        assert!(matches!(render_cell(preview, &rows[0], None), Cell::MiniMap { .. }));
        assert_eq!(render_cell(preview, &rows[1], None), Cell::InvalidLocation);
        assert_eq!(
            render_cell(preview, &rows[2], None),
            Cell::PreviewUnavailable {
                url: "https://goo.gl/maps/x".to_string()
            }
        );
        assert_eq!(render_cell(link, &rows[1], None), Cell::InvalidLocation);
        assert_eq!(
            render_cell(link, &rows[2], None),
            Cell::MapLink {
                url: "https://goo.gl/maps/x".to_string()
            }
        );
    }

    #[test]
    fn test_render_other_cells() {
        let columns = venue_columns(Language::Fr);
        let mut v = sample().remove(0);
        assert_eq!(render_cell(&columns[1], &v, None), Cell::Text("Le Grand Hôtel".into()));
        assert_eq!(render_cell(&columns[2], &v, None), Cell::Currency(format_price_eur("5000")));
        assert_eq!(render_cell(&columns[6], &v, None), Cell::Empty);
        assert_eq!(render_cell(&columns[7], &v, None), Cell::Empty);
        assert_eq!(render_cell(&columns[8], &v, None), Cell::Actions { venue_id: "1".into() });

        let image = LocationImage::StreetView("https://sv".into());
        assert_eq!(render_cell(&columns[6], &v, Some(&image)), Cell::Image(image.clone()));

        v.external_link = Some("https://domaine.example".into());
        assert_eq!(
            render_cell(&columns[7], &v, None),
            Cell::Link { url: "https://domaine.example".into() }
        );
    }
}
