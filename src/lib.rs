pub mod analyzers;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod output;
pub mod query;
pub mod reading;
pub mod station;
pub mod store;
pub mod weekday;
