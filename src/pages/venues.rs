use super::layout::{page, PageContext};
use crate::core::imagery::LocationImage;
use crate::core::table::{self, Cell, Column, Renderer};
use crate::domain::model::{Coordinate, SortDirection, SortDirective, Venue};
use crate::i18n::Language;
use maud::{html, Markup, PreEscaped};
use std::collections::HashMap;

const LEAFLET_CSS_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/leaflet.css";
const LEAFLET_JS_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/leaflet.js";
const MINI_MAP_JS: &str = include_str!("mini-map.js");
const MINI_MAP_ZOOM: u8 = 15;

/// Data behind the venues page: rows in display order, the active sort and
/// the images found for each venue id.
#[derive(Debug, Clone, Default)]
pub struct VenuesView {
    pub rows: Vec<Venue>,
    pub sort: Option<SortDirective>,
    pub images: HashMap<String, LocationImage>,
}

impl VenuesView {
    pub fn new(rows: &[Venue], sort: Option<SortDirective>) -> Self {
        Self {
            rows: table::sorted_rows(rows, sort).into_iter().cloned().collect(),
            sort,
            images: HashMap::new(),
        }
    }

    pub fn with_images(mut self, images: HashMap<String, LocationImage>) -> Self {
        self.images = images;
        self
    }
}

pub fn venues_page(ctx: &PageContext, view: &VenuesView) -> Markup {
    let lang = ctx.lang;
    let columns = table::venue_columns(lang);
    page(
        ctx,
        lang.t("venues.title"),
        Some(html! { link rel="stylesheet" href=(LEAFLET_CSS_URL); }),
        html! {
            div class="venues" {
                h2 { (lang.t("venues.title")) }
                a class="btn add" href="/venues/new" { (lang.t("venues.addButton")) }
                (venue_table(lang, &columns, view))
            }
            script src=(LEAFLET_JS_URL) {}
            script { (PreEscaped(MINI_MAP_JS)) }
        },
    )
}

fn venue_table(lang: Language, columns: &[Column], view: &VenuesView) -> Markup {
    html! {
        table {
            thead {
                tr {
                    @for column in columns {
                        th { (column_header(column, view.sort)) }
                    }
                }
            }
            tbody {
                @if view.rows.is_empty() {
                    tr {
                        td class="empty" colspan=(columns.len()) { (lang.t("venues.empty")) }
                    }
                }
                @for venue in &view.rows {
                    tr {
                        @for column in columns {
                            td {
                                (cell(lang, &table::render_cell(column, venue, view.images.get(&venue.id))))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn column_header(column: &Column, current: Option<SortDirective>) -> Markup {
    if !column.is_sortable() {
        return html! { (column.label) };
    }
    let next = SortDirective::toggle(current, column.field);
    let arrow = current
        .filter(|d| d.column == column.field)
        .map(|d| d.direction.arrow());
    let dir = match next.direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };
    let href = format!("?sort={}&dir={}", next.column, dir);
    html! {
        a class="sort" href=(href) {
            (column.label)
            @if let Some(arrow) = arrow {
                " " span class="arrow" { (arrow) }
            }
        }
    }
}

fn cell(lang: Language, cell: &Cell) -> Markup {
    match cell {
        Cell::Text(text) => html! { (text) },
        Cell::Currency(amount) => html! { span class="price" { (amount) } },
        Cell::MapLink { url } => html! {
            a class="map-link" href=(url) target="_blank" rel="noopener noreferrer" {
                (lang.t("venues.viewOnMaps"))
            }
        },
        Cell::MiniMap {
            coordinate,
            place_name,
            ..
        } => mini_map(*coordinate, place_name.as_deref()),
        Cell::PreviewUnavailable { url } => html! {
            div class="preview-unavailable" {
                span { (lang.t("venues.previewUnavailable")) }
                a href=(url) target="_blank" rel="noopener noreferrer" { (lang.t("venues.viewOnMaps")) }
            }
        },
        Cell::InvalidLocation => html! {
            span class="invalid-location" { (lang.t("venues.invalidLocation")) }
        },
        Cell::Image(image) => html! {
            img class="location-image" src=(image.url()) alt="Location" loading="lazy";
        },
        Cell::Link { url } => html! {
            a href=(url) target="_blank" rel="noopener noreferrer" { (url) }
        },
        Cell::Actions { venue_id } => html! {
            a class="btn edit" href=(format!("/venues/{}/edit", venue_id)) { (lang.t("common.edit")) }
            form class="delete" action=(format!("/venues/{}/delete", venue_id)) method="POST"
                onsubmit=(format!("return confirm('{}')", lang.t("venues.deleteConfirmation").replace('\'', "\\'"))) {
                input type="submit" value=(lang.t("common.delete"));
            }
        },
        Cell::Empty => html! {},
    }
}

fn mini_map(coordinate: Coordinate, place_name: Option<&str>) -> Markup {
    html! {
        div class="mini-map"
            style="height:150px;width:200px;"
            data-lat=(coordinate.lat())
            data-lng=(coordinate.lng())
            data-zoom=(MINI_MAP_ZOOM)
            data-name=(place_name.unwrap_or("Location")) {}
    }
}

/// The table as aligned text for the terminal. Image and action columns
/// are left out.
pub fn plain_table(lang: Language, view: &VenuesView) -> String {
    let columns: Vec<Column> = table::venue_columns(lang)
        .into_iter()
        .filter(|c| !matches!(c.renderer, Renderer::Image | Renderer::Actions))
        .collect();

    let header: Vec<String> = columns
        .iter()
        .map(|c| match view.sort {
            Some(d) if d.column == c.field && c.is_sortable() => {
                format!("{} {}", c.label, d.direction.arrow())
            }
            _ => c.label.clone(),
        })
        .collect();
    let body: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|venue| {
            columns
                .iter()
                .map(|c| table::render_cell(c, venue, None).plain_text())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| {
            std::iter::once(&header[i])
                .chain(body.iter().map(|row| &row[i]))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(s, w)| format!("{}{}", s, " ".repeat(w - s.chars().count())))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(&header)];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    if body.is_empty() {
        out.push(lang.t("venues.empty").to_string());
    }
    out.extend(body.iter().map(|row| line(row)));
    out.join("\n")
}
