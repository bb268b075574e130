use crate::analyzers::aggregate::weekday_profile;
use crate::analyzers::current::latest_per_station;
use crate::analyzers::writetos3::write_to_s3;
use crate::reading::Reading;
use crate::store::{Partition, ReadingStore};
use crate::weekday::Weekday;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use tracing::info;

/// An object ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

impl Document {
    fn json(key: String, value: &impl serde::Serialize) -> Result<Self> {
        Ok(Self {
            key,
            body: serde_json::to_vec(value)?,
            content_type: "application/json",
        })
    }
}

/// Builds the chart documents: one weekday profile per day plus the current snapshot.
pub fn aggregate_documents(readings: &[Reading]) -> Result<Vec<Document>> {
    let mut documents = Vec::with_capacity(8);

    for weekday in Weekday::all() {
        documents.push(Document::json(
            format!("aggregates/weekday={weekday}.json"),
            &weekday_profile(readings, weekday),
        )?);
    }

    documents.push(Document::json(
        "aggregates/current.json".to_string(),
        &latest_per_station(readings),
    )?);

    Ok(documents)
}

/// Reads partition files into raw archive objects, gzip-compressed when `gzip` is set.
pub fn archive_documents(partitions: &[Partition], gzip: bool) -> Result<Vec<Document>> {
    let mut documents = Vec::with_capacity(partitions.len());

    for partition in partitions {
        let contents = fs::read(&partition.path)
            .with_context(|| format!("failed to read {}", partition.path.display()))?;
        let key = format!(
            "raw/station={}/date={}.csv",
            partition.station.slug(),
            partition.date.format("%Y-%m-%d")
        );

        let document = if gzip {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&contents)?;
            Document {
                key: format!("{key}.gz"),
                body: encoder.finish()?,
                content_type: "application/gzip",
            }
        } else {
            Document {
                key,
                body: contents,
                content_type: "text/csv",
            }
        };
        documents.push(document);
    }

    Ok(documents)
}

/// Recomputes every chart document from the store and uploads it to S3.
#[tracing::instrument(skip(s3, store), fields(data_dir = %store.root().display()))]
pub async fn publish(s3: &aws_sdk_s3::Client, bucket: &str, store: &ReadingStore) -> Result<()> {
    let readings = store.load_all()?;
    info!(readings = readings.len(), "Loaded snapshot for publishing");

    let documents = aggregate_documents(&readings)?;
    let upload_count = documents.len();
    for document in documents {
        write_to_s3(s3, bucket, document).await?;
    }

    info!(upload_count, "Aggregates published");
    Ok(())
}

/// Uploads the raw CSV partitions of `date` to S3.
#[tracing::instrument(skip(s3, store), fields(date = %date))]
pub async fn archive_date(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    store: &ReadingStore,
    date: NaiveDate,
    gzip: bool,
) -> Result<()> {
    let partitions = store.partitions_for_date(date)?;
    let documents = archive_documents(&partitions, gzip)?;
    let upload_count = documents.len();

    for document in documents {
        write_to_s3(s3, bucket, document).await?;
    }

    info!(upload_count, "Partitions archived");
    Ok(())
}
