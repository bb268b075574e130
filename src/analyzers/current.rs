use crate::reading::Reading;
use crate::station::Station;
use std::collections::BTreeMap;

/// Latest reading of each station, ordered by station.
///
/// On equal timestamps the reading that comes later in `readings` wins.
pub fn latest_per_station(readings: &[Reading]) -> Vec<Reading> {
    let mut latest: BTreeMap<Station, &Reading> = BTreeMap::new();
    for reading in readings {
        let newer_seen = latest
            .get(&reading.station)
            .is_some_and(|current| current.timestamp > reading.timestamp);
        if !newer_seen {
            latest.insert(reading.station, reading);
        }
    }
    latest.into_values().cloned().collect()
}

/// Latest reading of `station`, if it has any.
pub fn latest_for(readings: &[Reading], station: Station) -> Option<Reading> {
    readings
        .iter()
        .filter(|r| r.station == station)
        .fold(None, |best: Option<&Reading>, r| match best {
            Some(b) if b.timestamp > r.timestamp => Some(b),
            _ => Some(r),
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn reading(ts: &str, station: Station, available: u32) -> Reading {
        let ts = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        Reading::new(ts, station).with_counts(Some(16), Some(available))
    }

    #[test]
    fn test_latest_per_station() {
        let readings = vec![
            reading("2025-10-06 08:00:00", Station::ObereAu, 1),
            reading("2025-10-06 10:00:00", Station::ObereAu, 2),
            reading("2025-10-06 09:00:00", Station::ObereAu, 3),
            reading("2025-10-05 09:00:00", Station::Bahnhofplatz, 4),
        ];
        let latest = latest_per_station(&readings);

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].station, Station::Bahnhofplatz);
        assert_eq!(latest[0].bikes_available, Some(4));
        assert_eq!(latest[1].station, Station::ObereAu);
        assert_eq!(latest[1].bikes_available, Some(2));
    }

    #[test]
    fn test_equal_timestamps_keep_later_row() {
        let readings = vec![
            reading("2025-10-06 08:00:00", Station::Kantonsspital, 1),
            reading("2025-10-06 08:00:00", Station::Kantonsspital, 2),
        ];
        assert_eq!(latest_per_station(&readings)[0].bikes_available, Some(2));
        assert_eq!(
            latest_for(&readings, Station::Kantonsspital).unwrap().bikes_available,
            Some(2)
        );
    }

    #[test]
    fn test_latest_for_missing_station() {
        let readings = vec![reading("2025-10-06 08:00:00", Station::ObereAu, 1)];
        assert_eq!(latest_for(&readings, Station::Bahnhofplatz), None);
        assert!(latest_per_station(&[]).is_empty());
    }

    #[test]
    fn test_current_json_in_name_order() {
        let readings = vec![
            reading("2025-10-05 08:00:00", Station::ObereAu, 1),
            reading("2025-10-05 08:00:00", Station::Kantonsspital, 2),
            reading("2025-10-05 08:00:00", Station::Bahnhofplatz, 3),
        ];
        let json = serde_json::to_string(&latest_per_station(&readings)).unwrap();

        let bahnhof = json.find("\"Bahnhofplatz\"").unwrap();
        let spital = json.find("\"Kantonsspital\"").unwrap();
        let obere_au = json.find("\"Obere Au\"").unwrap();
        assert!(bahnhof < spital && spital < obere_au, "{json}");
    }
}
