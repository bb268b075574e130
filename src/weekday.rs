//! Weekday designators, numbered Sunday = 1 … Saturday = 7.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// A day of the week in day-of-week numbering (Sunday = 1 … Saturday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Weekday(u8);

static NAMES: &[(&str, u8)] = &[
    ("so", 1),
    ("sonntag", 1),
    ("mo", 2),
    ("montag", 2),
    ("di", 3),
    ("dienstag", 3),
    ("mi", 4),
    ("mittwoch", 4),
    ("do", 5),
    ("donnerstag", 5),
    ("fr", 6),
    ("freitag", 6),
    ("sa", 7),
    ("samstag", 7),
];

impl Weekday {
    pub const SUNDAY: Weekday = Weekday(1);
    pub const SATURDAY: Weekday = Weekday(7);

    pub fn new(number: u8) -> Option<Self> {
        (1..=7).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// All seven days, Sunday first.
    pub fn all() -> impl Iterator<Item = Weekday> {
        (1..=7).map(Weekday)
    }

    pub fn of(timestamp: &NaiveDateTime) -> Self {
        // number_from_sunday is 1..=7
        Self(timestamp.weekday().number_from_sunday() as u8)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Weekday {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Resolves a German weekday abbreviation, full name or number 1–7.
///
/// # Errors
///
/// Returns [`QueryError::InvalidWeekday`] when the designator is neither a
/// known name nor a number in `1..=7`.
pub fn resolve(input: &str) -> Result<Weekday, QueryError> {
    let key = input.trim().to_lowercase();

    if let Some((_, n)) = NAMES.iter().find(|(name, _)| *name == key) {
        return Ok(Weekday(*n));
    }

    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        if let Some(day) = key.parse::<u8>().ok().and_then(Weekday::new) {
            return Ok(day);
        }
    }

    Err(QueryError::InvalidWeekday(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_sunday_designators() {
        for raw in ["So", "sonntag", "SO", "1", " Sonntag "] {
            assert_eq!(resolve(raw), Ok(Weekday::SUNDAY), "{raw}");
        }
    }

    #[test]
    fn test_full_week() {
        let names = ["mo", "di", "mi", "do", "fr", "sa"];
        for (i, name) in names.iter().enumerate() {
            assert_eq!(resolve(name).unwrap().number(), i as u8 + 2);
        }
        assert_eq!(resolve("Samstag"), Ok(Weekday::SATURDAY));
    }

    #[test]
    fn test_invalid_designators() {
        for raw in ["8", "0", "xyz", "", "-1", "+3", "1.0"] {
            assert_eq!(
                resolve(raw),
                Err(QueryError::InvalidWeekday(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_of_timestamp() {
        // 2025-10-05 was a Sunday, 2025-10-11 a Saturday
        let sunday = NaiveDate::from_ymd_opt(2025, 10, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let saturday = NaiveDate::from_ymd_opt(2025, 10, 11)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();

        assert_eq!(Weekday::of(&sunday), Weekday::SUNDAY);
        assert_eq!(Weekday::of(&saturday), Weekday::SATURDAY);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Mittwoch".parse::<Weekday>(), Ok(Weekday::new(4).unwrap()));
        assert_eq!(
            "Feiertag".parse::<Weekday>(),
            Err(QueryError::InvalidWeekday("Feiertag".to_string()))
        );
    }

    #[test]
    fn test_all_days() {
        let days: Vec<u8> = Weekday::all().map(Weekday::number).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
