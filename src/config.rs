//! Runtime configuration, read from the environment (and `.env`).
//!
//! ```text
//! VELOMETER_DATA_DIR   root of the CSV store        (default: data)
//! VELOMETER_FEED_URL   Nextbike live JSON feed      (default: public live feed)
//! VELOMETER_S3_BUCKET  bucket for publish/archive   (optional)
//! ```

use std::path::PathBuf;

pub const DEFAULT_FEED_URL: &str = "https://api.nextbike.net/maps/nextbike-live.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub feed_url: String,
    pub s3_bucket: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            feed_url: DEFAULT_FEED_URL.to_string(),
            s3_bucket: None,
        }
    }
}

impl Config {
    /// Builds the config from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            data_dir: get("VELOMETER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            feed_url: get("VELOMETER_FEED_URL").unwrap_or(defaults.feed_url),
            s3_bucket: get("VELOMETER_S3_BUCKET"),
        }
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}
