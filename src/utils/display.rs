use crate::api::categories::label_for;
use crate::domain::model::{Place, ResultSet};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

const MISSING: &str = "—";

/// `Free` for level 0, one `$` per level otherwise.
pub fn price_glyph(price_level: Option<u8>) -> String {
    match price_level {
        None => MISSING.to_string(),
        Some(0) => "Free".to_string(),
        Some(level) => "$".repeat(level as usize),
    }
}

pub fn rating_summary(place: &Place) -> String {
    let rating = place
        .rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| MISSING.to_string());
    format!("{} ({} reviews)", rating, place.rating_count())
}

pub fn address(place: &Place) -> &str {
    place.vicinity.as_deref().unwrap_or("")
}

/// Numbered plain-text list, one place per two lines.
pub fn render_list(results: &ResultSet) -> String {
    let mut out = format!("Results ({})\n", results.len());
    for (i, place) in results.places().iter().enumerate() {
        let glyph = place
            .types
            .iter()
            .find_map(|t| label_for(t))
            .map(|g| format!("{} ", g))
            .unwrap_or_default();
        out.push_str(&format!("{:>3}. {}{}\n", i + 1, glyph, place.name));
        out.push_str(&format!(
            "     {} | {} | {}\n",
            address(place),
            rating_summary(place),
            price_glyph(place.price_level)
        ));
    }
    out
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    place_id: &'a str,
    name: &'a str,
    address: &'a str,
    rating: Option<f64>,
    reviews: u64,
    price: String,
    lat: Option<f64>,
    lng: Option<f64>,
}

pub fn write_csv<W: Write>(results: &ResultSet, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, place) in results.places().iter().enumerate() {
        let location = place.location();
        wtr.serialize(CsvRow {
            rank: i + 1,
            place_id: place.place_id.as_deref().unwrap_or(""),
            name: &place.name,
            address: address(place),
            rating: place.rating,
            reviews: place.rating_count(),
            price: price_glyph(place.price_level),
            lat: location.map(|l| l.lat),
            lng: location.map(|l| l.lng),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
