//! Data types produced by the aggregation functions.

use serde::Serialize;
use serde::ser::SerializeMap;
use std::collections::BTreeMap;

use crate::error::QueryError;
use crate::station::Station;
use crate::weekday::Weekday;

pub const HOURS_PER_DAY: usize = 24;

/// Inclusive hour-of-day range, `0 <= start_hour <= end_hour <= 23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    start_hour: u8,
    end_hour: u8,
}

impl HourRange {
    pub const FULL_DAY: HourRange = HourRange {
        start_hour: 0,
        end_hour: 23,
    };

    /// Builds a range from already-clamped hours.
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self, QueryError> {
        if start_hour > end_hour || end_hour > 23 {
            return Err(QueryError::InvalidRange {
                start_hour,
                end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Clamps both ends into `0..=23` before validating their order.
    pub fn clamped(start_hour: i64, end_hour: i64) -> Result<Self, QueryError> {
        Self::new(clamp_hour(start_hour), clamp_hour(end_hour))
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    /// Number of hours covered.
    pub fn width(&self) -> usize {
        usize::from(self.end_hour - self.start_hour) + 1
    }

    pub fn hours(&self) -> impl Iterator<Item = u8> {
        self.start_hour..=self.end_hour
    }
}

fn clamp_hour(hour: i64) -> u8 {
    hour.clamp(0, 23) as u8
}

/// Average availability for one hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourBucket {
    pub hour: u8,
    #[serde(rename = "avg_bikes")]
    pub average_available: Option<f64>,
    #[serde(rename = "samples")]
    pub sample_count: usize,
}

impl HourBucket {
    pub fn empty(hour: u8) -> Self {
        Self {
            hour,
            average_available: None,
            sample_count: 0,
        }
    }
}

/// Best contiguous run of hours. All fields but `length_hours` are null
/// when no fully populated run exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Window {
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
    #[serde(rename = "avg_bikes")]
    pub average_available: Option<f64>,
    #[serde(rename = "hours")]
    pub length_hours: usize,
}

impl Window {
    pub fn empty(length_hours: usize) -> Self {
        Self {
            start_hour: None,
            end_hour: None,
            average_available: None,
            length_hours,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.average_available.is_none()
    }
}

/// Mean availability for each of the 24 hours; serialized as `{"0": x, …, "23": x}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyProfile(pub [Option<f64>; HOURS_PER_DAY]);

impl HourlyProfile {
    pub fn get(&self, hour: u8) -> Option<f64> {
        self.0.get(usize::from(hour)).copied().flatten()
    }
}

impl Serialize for HourlyProfile {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(HOURS_PER_DAY))?;
        for (hour, avg) in self.0.iter().enumerate() {
            map.serialize_entry(&hour.to_string(), avg)?;
        }
        map.end()
    }
}

/// Per-station hourly profiles for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayProfile {
    pub weekday: Weekday,
    pub data: BTreeMap<Station, HourlyProfile>,
}

/// Result of a per-station, per-weekday stats query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    pub station: Station,
    pub weekday: Weekday,
    pub range: HourRange,
    pub hours: Vec<HourBucket>,
    pub best_window: Window,
}
