//! Validation errors raised before any aggregation runs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown station '{0}', expected one of: Bahnhofplatz, Obere Au, Kantonsspital")]
    InvalidStation(String),

    #[error("unknown weekday '{0}', expected So..Sa, Sonntag..Samstag or 1..7 (Sunday = 1)")]
    InvalidWeekday(String),

    #[error("start hour {start_hour} is after end hour {end_hour}")]
    InvalidRange { start_hour: u8, end_hour: u8 },
}
