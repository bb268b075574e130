//! Nextbike live-feed parsing.
//!
//! The feed nests stations as `countries[].cities[].places[]`. Only places
//! whose name normalizes to a tracked [`Station`] become readings.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::debug;

use crate::reading::Reading;
use crate::station::{self, Station};

/// Field names tried in order for the rack count.
const RACK_FIELDS: &[&str] = &["bike_racks", "rack_count", "total_racks"];
/// Field names tried in order for the number of rentable bikes.
const AVAILABLE_FIELDS: &[&str] = &["bikes_available_to_rent", "bikes", "available_bikes"];

/// Decodes a Nextbike JSON document into readings stamped with `timestamp`.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON.
pub fn parse_feed(bytes: &[u8], timestamp: NaiveDateTime) -> Result<Vec<Reading>> {
    let doc: Value = serde_json::from_slice(bytes).context("feed is not valid JSON")?;
    Ok(extract_readings(&doc, timestamp))
}

pub fn extract_readings(doc: &Value, timestamp: NaiveDateTime) -> Vec<Reading> {
    let mut readings = Vec::new();

    for place in places(doc) {
        let Some(name) = place["name"].as_str().filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        let station: Station = match station::normalize(name) {
            Ok(station) => station,
            Err(_) => {
                debug!(name, "Skipping untracked place");
                continue;
            }
        };

        readings.push(Reading::new(timestamp, station).with_counts(
            first_count(place, RACK_FIELDS),
            first_count(place, AVAILABLE_FIELDS),
        ));
    }

    readings
}

fn places(doc: &Value) -> impl Iterator<Item = &Value> {
    array(&doc["countries"])
        .flat_map(|country| array(&country["cities"]))
        .flat_map(|city| array(&city["places"]))
}

fn array(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

/// Takes the first field that is present and not null, then coerces it to a count.
/// A present but non-numeric value yields `None` rather than falling through.
fn first_count(place: &Value, fields: &[&str]) -> Option<u32> {
    let value = fields
        .iter()
        .map(|f| &place[*f])
        .find(|v| !v.is_null())?;

    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .and_then(|f| u32::try_from(f as u64).ok()),
        _ => None,
    }
}
