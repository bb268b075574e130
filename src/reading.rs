use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::station::Station;
use crate::weekday::Weekday;

/// Wire format for reading timestamps: local civil time, no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One station telemetry sample.
///
/// Field names on the wire match the columns the ingestion side has always
/// written (`date`, `station_name`, `bike_racks`, `bike_available_to_rent`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "date", with = "local_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "station_name")]
    pub station: Station,
    pub bike_racks: Option<u32>,
    #[serde(rename = "bike_available_to_rent")]
    pub bikes_available: Option<u32>,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, station: Station) -> Self {
        Self {
            timestamp,
            station,
            bike_racks: None,
            bikes_available: None,
        }
    }

    pub fn with_counts(mut self, bike_racks: Option<u32>, bikes_available: Option<u32>) -> Self {
        self.bike_racks = bike_racks;
        self.bikes_available = bikes_available;
        self
    }

    /// Hour of day in local time, `0..=23`.
    pub fn hour(&self) -> u8 {
        self.timestamp.hour() as u8
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::of(&self.timestamp)
    }
}

mod local_timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}
