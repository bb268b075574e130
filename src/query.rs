//! Parameter validation and execution of the per-station stats query.

use serde::Deserialize;

use crate::analyzers::aggregate::hourly_buckets;
use crate::analyzers::types::{HourRange, StatsResponse};
use crate::analyzers::window::best_window;
use crate::error::QueryError;
use crate::reading::Reading;
use crate::station::Station;
use crate::weekday::Weekday;

pub const DEFAULT_WINDOW_HOURS: i64 = 2;

/// Raw, unvalidated query parameters as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatsParams {
    pub station: String,
    pub weekday: String,
    #[serde(default)]
    pub start_hour: Option<i64>,
    #[serde(default)]
    pub end_hour: Option<i64>,
    #[serde(default)]
    pub hours: Option<i64>,
}

/// A validated stats query. Construction fails before any aggregation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsQuery {
    pub station: Station,
    pub weekday: Weekday,
    pub range: HourRange,
    pub hours: usize,
}

impl StatsQuery {
    /// Validates `params`: normalizes the station, resolves the weekday,
    /// clamps the hour range into `0..=23` and the window length to at least 1.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidStation`], [`QueryError::InvalidWeekday`] or
    /// [`QueryError::InvalidRange`] when start hour is after end hour.
    pub fn from_params(params: &StatsParams) -> Result<Self, QueryError> {
        let station: Station = params.station.parse()?;
        let weekday: Weekday = params.weekday.parse()?;
        let range = HourRange::clamped(params.start_hour.unwrap_or(0), params.end_hour.unwrap_or(23))?;
        let hours = params.hours.unwrap_or(DEFAULT_WINDOW_HOURS).max(1);

        Ok(Self {
            station,
            weekday,
            range,
            hours: usize::try_from(hours).unwrap_or(usize::MAX),
        })
    }

    /// Runs the query against a snapshot. Readings of other stations and
    /// weekdays are ignored.
    pub fn run(&self, readings: &[Reading]) -> StatsResponse {
        let matching: Vec<Reading> = readings
            .iter()
            .filter(|r| r.station == self.station && r.weekday() == self.weekday)
            .cloned()
            .collect();

        let hours = hourly_buckets(&matching, self.range);
        let best_window = best_window(&hours, self.hours);

        StatsResponse {
            station: self.station,
            weekday: self.weekday,
            range: self.range,
            hours,
            best_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn params(station: &str, weekday: &str) -> StatsParams {
        StatsParams {
            station: station.to_string(),
            weekday: weekday.to_string(),
            start_hour: None,
            end_hour: None,
            hours: None,
        }
    }

    // 2025-10-05 was a Sunday
    fn sunday_reading(hour: u32, station: Station, available: Option<u32>) -> Reading {
        let ts = NaiveDate::from_ymd_opt(2025, 10, 5)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Reading::new(ts, station).with_counts(Some(20), available)
    }

    #[test]
    fn test_defaults() {
        let q = StatsQuery::from_params(&params("Obere Au", "So")).unwrap();

        assert_eq!(q.station, Station::ObereAu);
        assert_eq!(q.weekday, Weekday::SUNDAY);
        assert_eq!(q.range, HourRange::FULL_DAY);
        assert_eq!(q.hours, 2);
    }

    #[test]
    fn test_clamping() {
        let mut p = params("bahnhofplatz", "7");
        p.start_hour = Some(-5);
        p.end_hour = Some(99);
        p.hours = Some(0);
        let q = StatsQuery::from_params(&p).unwrap();

        assert_eq!(q.range, HourRange::FULL_DAY);
        assert_eq!(q.hours, 1);
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            StatsQuery::from_params(&params("Chur Bahnhof", "So")),
            Err(QueryError::InvalidStation("Chur Bahnhof".to_string()))
        );
        assert_eq!(
            StatsQuery::from_params(&params("Obere Au", "8")),
            Err(QueryError::InvalidWeekday("8".to_string()))
        );

        let mut p = params("Obere Au", "So");
        p.start_hour = Some(12);
        p.end_hour = Some(6);
        assert!(matches!(
            StatsQuery::from_params(&p),
            Err(QueryError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_station_checked_before_weekday() {
        assert!(matches!(
            StatsQuery::from_params(&params("nowhere", "xyz")),
            Err(QueryError::InvalidStation(_))
        ));
    }

    #[test]
    fn test_empty_result_is_fully_populated() {
        let mut p = params("Kantonsspital", "Mo");
        p.start_hour = Some(6);
        p.end_hour = Some(9);
        let response = StatsQuery::from_params(&p).unwrap().run(&[]);

        assert_eq!(response.hours.len(), 4);
        assert!(response.hours.iter().all(|b| b.average_available.is_none()));
        assert!(response.best_window.is_empty());
        assert_eq!(response.best_window.length_hours, 2);
    }

    #[test]
    fn test_run_filters_station_and_weekday() {
        let mut p = params("Obere Au", "So");
        p.hours = Some(3);
        let q = StatsQuery::from_params(&p).unwrap();

        let monday = NaiveDate::from_ymd_opt(2025, 10, 6)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        let readings = vec![
            sunday_reading(5, Station::ObereAu, Some(3)),
            sunday_reading(6, Station::ObereAu, Some(5)),
            sunday_reading(7, Station::ObereAu, Some(4)),
            sunday_reading(6, Station::ObereAu, None),
            sunday_reading(5, Station::Bahnhofplatz, Some(100)),
            Reading::new(monday, Station::ObereAu).with_counts(None, Some(100)),
        ];
        let response = q.run(&readings);

        assert_eq!(response.hours[5].average_available, Some(3.0));
        assert_eq!(response.hours[6].sample_count, 1);
        assert_eq!(response.best_window.start_hour, Some(5));
        assert_eq!(response.best_window.end_hour, Some(7));
        assert_eq!(response.best_window.average_available, Some(4.0));
    }

    #[test]
    fn test_response_json_shape() {
        let q = StatsQuery::from_params(&params("Obere Au", "So")).unwrap();
        let json = serde_json::to_value(q.run(&[sunday_reading(8, Station::ObereAu, Some(2))])).unwrap();

        assert_eq!(json["station"], "Obere Au");
        assert_eq!(json["weekday"], 1);
        assert_eq!(json["range"]["start_hour"], 0);
        assert_eq!(json["range"]["end_hour"], 23);
        assert_eq!(json["hours"].as_array().unwrap().len(), 24);
        assert_eq!(json["hours"][8]["avg_bikes"], 2.0);
        assert_eq!(json["hours"][8]["samples"], 1);
        assert!(json["hours"][9]["avg_bikes"].is_null());
        assert!(json["best_window"]["avg_bikes"].is_null());
        assert_eq!(json["best_window"]["hours"], 2);
    }

    #[test]
    fn test_run_is_deterministic() {
        let q = StatsQuery::from_params(&params("Obere Au", "So")).unwrap();
        let readings = vec![
            sunday_reading(8, Station::ObereAu, Some(2)),
            sunday_reading(9, Station::ObereAu, Some(3)),
            sunday_reading(9, Station::ObereAu, Some(7)),
        ];

        let first = serde_json::to_string(&q.run(&readings)).unwrap();
        let second = serde_json::to_string(&q.run(&readings)).unwrap();
        assert_eq!(first, second);
    }
}
