//! Human-readable (table) rendering of API results.
//!
//! Each function returns the full text to print so callers decide where it goes.

use crate::models::{Apod, AsteroidSummary, EpicCollection, EpicImage, MarsPhoto, NearEarthObject};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Long listings are cut off after this many rows.
pub const MAX_ROWS: usize = 20;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

fn opt_number(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}

fn truncation_note(shown: usize, total: usize) -> Option<String> {
    (total > shown).then(|| format!("... and {} more (showing first {} only)", total - shown, shown))
}

fn no_results(what: &str) -> String {
    format!("No {} found.", what).yellow().to_string()
}

pub fn apod_report(apods: &[Apod]) -> String {
    if apods.is_empty() {
        return no_results("APOD entries");
    }

    let mut table = new_table(&["Date", "Title", "Media", "Copyright", "URL"]);
    for apod in apods {
        table.add_row(vec![
            Cell::new(&apod.date),
            Cell::new(&apod.title),
            Cell::new(apod.media_type),
            Cell::new(apod.copyright.as_deref().unwrap_or("Public domain")),
            Cell::new(&apod.url),
        ]);
    }

    let mut out = format!("{}\n{}", "Astronomy Picture of the Day".cyan().bold(), table);

    // A single entry gets its full write-up.
    if let [apod] = apods {
        out.push_str(&format!("\n\n{}\n{}", apod.title.bold(), apod.explanation));
        if let Some(hd) = &apod.hd_url {
            out.push_str(&format!("\n\nHD image: {}", hd));
        }
        if let Some(thumb) = &apod.video_thumbnail_url {
            out.push_str(&format!("\n\nVideo thumbnail: {}", thumb));
        }
    }
    out
}

pub fn asteroid_feed_report(rows: &[AsteroidSummary], total: u32, hazardous: usize) -> String {
    let heading = format!(
        "{} near-Earth objects, {} potentially hazardous",
        total, hazardous
    );
    if rows.is_empty() {
        return format!("{}\n{}", heading.cyan().bold(), no_results("matching asteroids"));
    }

    let mut table = new_table(&[
        "Name",
        "ID",
        "Approach",
        "Hazardous",
        "Diameter (m)",
        "Miss distance (km)",
        "Velocity (km/s)",
    ]);
    for row in rows.iter().take(MAX_ROWS) {
        let hazardous = if row.hazardous {
            Cell::new("yes").fg(Color::Red)
        } else {
            Cell::new("no")
        };
        let diameter = match (row.diameter_min_m, row.diameter_max_m) {
            (Some(min), Some(max)) => format!("{:.0}-{:.0}", min, max),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(&row.id),
            Cell::new(&row.approach_date),
            hazardous,
            Cell::new(diameter),
            Cell::new(opt_number(row.miss_distance_km, 0)),
            Cell::new(opt_number(row.velocity_km_s, 2)),
        ]);
    }

    let mut out = format!("{}\n{}", heading.cyan().bold(), table);
    if let Some(note) = truncation_note(rows.len().min(MAX_ROWS), rows.len()) {
        out.push_str(&format!("\n{}", note));
    }
    out
}

pub fn asteroid_detail_report(neo: &NearEarthObject) -> String {
    let summary = neo.summary();
    let mut details = new_table(&["Field", "Value"]);
    details
        .add_row(vec![Cell::new("Name"), Cell::new(&neo.name)])
        .add_row(vec![Cell::new("ID"), Cell::new(&neo.id)])
        .add_row(vec![
            Cell::new("Absolute magnitude (H)"),
            Cell::new(opt_number(neo.absolute_magnitude_h, 2)),
        ])
        .add_row(vec![
            Cell::new("Diameter (m)"),
            Cell::new(format!(
                "{} - {}",
                opt_number(summary.diameter_min_m, 1),
                opt_number(summary.diameter_max_m, 1)
            )),
        ])
        .add_row(vec![
            Cell::new("Potentially hazardous"),
            Cell::new(if neo.is_potentially_hazardous_asteroid {
                "yes"
            } else {
                "no"
            }),
        ])
        .add_row(vec![
            Cell::new("Sentry object"),
            Cell::new(if neo.is_sentry_object { "yes" } else { "no" }),
        ]);
    if let Some(url) = &neo.nasa_jpl_url {
        details.add_row(vec![Cell::new("JPL"), Cell::new(url)]);
    }

    let mut out = format!("{}\n{}", neo.name.cyan().bold(), details);

    if !neo.close_approach_data.is_empty() {
        let mut approaches = new_table(&[
            "Date",
            "Orbiting",
            "Miss distance (km)",
            "Miss distance (LD)",
            "Velocity (km/s)",
        ]);
        for approach in neo.close_approach_data.iter().take(MAX_ROWS) {
            approaches.add_row(vec![
                Cell::new(
                    approach
                        .close_approach_date_full
                        .as_deref()
                        .unwrap_or(&approach.close_approach_date),
                ),
                Cell::new(approach.orbiting_body.as_deref().unwrap_or("-")),
                Cell::new(opt_number(approach.miss_distance_km(), 0)),
                Cell::new(opt_number(approach.miss_distance_lunar(), 2)),
                Cell::new(opt_number(approach.velocity_km_s(), 2)),
            ]);
        }
        out.push_str(&format!("\n\n{}\n{}", "Close approaches".bold(), approaches));
        let total = neo.close_approach_data.len();
        if let Some(note) = truncation_note(total.min(MAX_ROWS), total) {
            out.push_str(&format!("\n{}", note));
        }
    }
    out
}

pub fn rover_photos_report(photos: &[MarsPhoto]) -> String {
    if photos.is_empty() {
        return no_results("rover photos");
    }

    let mut table = new_table(&["ID", "Rover", "Sol", "Earth date", "Camera", "Image"]);
    for photo in photos.iter().take(MAX_ROWS) {
        table.add_row(vec![
            Cell::new(photo.id),
            Cell::new(&photo.rover.name),
            Cell::new(photo.sol),
            Cell::new(&photo.earth_date),
            Cell::new(format!("{} ({})", photo.camera.name, photo.camera.full_name)),
            Cell::new(&photo.img_src),
        ]);
    }

    let mut out = format!(
        "{}\n{}",
        format!("{} rover photos", photos.len()).cyan().bold(),
        table
    );
    if let Some(note) = truncation_note(photos.len().min(MAX_ROWS), photos.len()) {
        out.push_str(&format!("\n{}", note));
    }
    out
}

pub fn epic_report(images: &[EpicImage], collection: EpicCollection) -> String {
    if images.is_empty() {
        return no_results("EPIC images");
    }

    let mut table = new_table(&["Taken (UTC)", "Centroid lat", "Centroid lon", "Image"]);
    for image in images.iter().take(MAX_ROWS) {
        let (lat, lon) = match image.centroid_coordinates {
            Some(c) => (format!("{:.2}", c.lat), format!("{:.2}", c.lon)),
            None => ("-".to_string(), "-".to_string()),
        };
        let url = image
            .archive_url(collection)
            .unwrap_or_else(|_| image.image.clone());
        table.add_row(vec![
            Cell::new(&image.date),
            Cell::new(lat),
            Cell::new(lon),
            Cell::new(url),
        ]);
    }

    let mut out = format!(
        "{}\n{}",
        format!("EPIC {} imagery: {} images", collection, images.len())
            .cyan()
            .bold(),
        table
    );
    if let Some(note) = truncation_note(images.len().min(MAX_ROWS), images.len()) {
        out.push_str(&format!("\n{}", note));
    }
    out
}
