//! Date-partitioned CSV store for [`Reading`]s.
//!
//! Layout: `<data_dir>/station=<slug>/date=YYYY-MM-DD.csv`, one row per
//! reading, header written once per file.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Config;
use crate::output::append_record;
use crate::reading::Reading;
use crate::station::Station;

const STATION_PREFIX: &str = "station=";

/// One station's CSV file for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub station: Station,
    pub date: NaiveDate,
    pub path: PathBuf,
}

pub struct ReadingStore {
    root: PathBuf,
}

impl ReadingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.data_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn station_dir(&self, station: Station) -> PathBuf {
        self.root.join(format!("{STATION_PREFIX}{}", station.slug()))
    }

    fn partition_path(&self, station: Station, date: NaiveDate) -> PathBuf {
        self.station_dir(station)
            .join(format!("date={}.csv", date.format("%Y-%m-%d")))
    }

    /// Appends a reading to its station/date partition.
    pub fn append(&self, reading: &Reading) -> Result<()> {
        let dir = self.station_dir(reading.station);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let path = self.partition_path(reading.station, reading.timestamp.date());
        append_record(&path, reading)
    }

    pub fn append_all(&self, readings: &[Reading]) -> Result<usize> {
        for reading in readings {
            self.append(reading)?;
        }
        Ok(readings.len())
    }

    /// Loads every reading stored for `station`. A missing directory yields no readings.
    pub fn load_station(&self, station: Station) -> Result<Vec<Reading>> {
        let dir = self.station_dir(station);
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "No partitions for station");
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                files.push(path);
            }
        }
        // read_dir order is unspecified
        files.sort();

        let mut rows = Vec::new();
        for path in files {
            rows.extend(load_file(&path)?);
        }
        Ok(rows)
    }

    /// Loads every reading of every station.
    pub fn load_all(&self) -> Result<Vec<Reading>> {
        let mut rows = Vec::new();
        for station in self.stations()? {
            rows.extend(self.load_station(station)?);
        }
        Ok(rows)
    }

    /// Stations that have a partition directory, in station order.
    pub fn stations(&self) -> Result<Vec<Station>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut stations = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(station) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_prefix(STATION_PREFIX))
                .and_then(Station::from_slug)
            {
                stations.push(station);
            }
        }
        stations.sort();
        Ok(stations)
    }

    /// Existing partition files for `date`, across all stations.
    pub fn partitions_for_date(&self, date: NaiveDate) -> Result<Vec<Partition>> {
        let mut partitions = Vec::new();
        for station in self.stations()? {
            let path = self.partition_path(station, date);
            if path.exists() {
                partitions.push(Partition {
                    station,
                    date,
                    path,
                });
            }
        }
        Ok(partitions)
    }
}

fn load_file(path: &Path) -> Result<Vec<Reading>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: Reading =
            result.with_context(|| format!("malformed row in {}", path.display()))?;
        rows.push(record);
    }
    Ok(rows)
}
