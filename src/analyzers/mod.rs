//! Availability aggregation over stored readings.
//!
//! Hourly averages, best windows and weekday profiles are pure functions
//! over a snapshot; [`analyzer`] turns them into JSON documents and uploads
//! them, together with raw partitions, to S3.

pub mod aggregate;
pub mod analyzer;
pub mod current;
pub mod types;
pub mod utility;
pub mod window;
pub mod writetos3;
