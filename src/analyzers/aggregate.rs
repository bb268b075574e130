use crate::analyzers::types::{HOURS_PER_DAY, HourBucket, HourRange, HourlyProfile, WeekdayProfile};
use crate::analyzers::utility::Accumulator;
use crate::reading::Reading;
use crate::station::Station;
use crate::weekday::Weekday;
use std::collections::BTreeMap;

/// Groups availability by hour of day into 24 slots.
///
/// Readings without a known availability are skipped and do not count as samples.
fn accumulate<'a>(readings: impl IntoIterator<Item = &'a Reading>) -> [Accumulator; HOURS_PER_DAY] {
    let mut slots = [Accumulator::default(); HOURS_PER_DAY];
    for reading in readings {
        if let Some(available) = reading.bikes_available {
            slots[usize::from(reading.hour())].push(f64::from(available));
        }
    }
    slots
}

/// Averages `readings` per hour of day over `range`.
///
/// `readings` are expected to be filtered to one station and weekday already.
/// Returns one bucket per hour of the range in ascending order; hours without
/// samples are present with a `None` average.
pub fn hourly_buckets(readings: &[Reading], range: HourRange) -> Vec<HourBucket> {
    let slots = accumulate(readings);

    let mut buckets = Vec::with_capacity(range.width());
    for hour in range.hours() {
        let slot = slots[usize::from(hour)];
        if slot.count() == 0 {
            buckets.push(HourBucket::empty(hour));
        } else {
            buckets.push(HourBucket {
                hour,
                average_available: slot.mean(),
                sample_count: slot.count(),
            });
        }
    }
    buckets
}

/// Builds the full-day hourly profile of every station that has readings on `weekday`.
pub fn weekday_profile(readings: &[Reading], weekday: Weekday) -> WeekdayProfile {
    let mut by_station: BTreeMap<Station, Vec<&Reading>> = BTreeMap::new();
    for reading in readings.iter().filter(|r| r.weekday() == weekday) {
        by_station.entry(reading.station).or_default().push(reading);
    }

    let data = by_station
        .into_iter()
        .map(|(station, rows)| {
            let slots = accumulate(rows);
            (station, HourlyProfile(slots.map(|slot| slot.mean())))
        })
        .collect();

    WeekdayProfile { weekday, data }
}
