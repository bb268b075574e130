//! CLI entry point for velometer.
//!
//! Provides subcommands for ingesting the bike-share feed, answering
//! availability queries from the local store, and publishing aggregates
//! to S3 for the chart front end.

use anyhow::{Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use velometer::analyzers::aggregate::weekday_profile;
use velometer::analyzers::analyzer::{archive_date, publish};
use velometer::analyzers::current::{latest_for, latest_per_station};
use velometer::config::Config;
use velometer::feed::parse_feed;
use velometer::fetch::{BasicClient, HttpClient, load_source};
use velometer::output::print_json;
use velometer::query::{StatsParams, StatsQuery};
use velometer::station::Station;
use velometer::store::ReadingStore;
use velometer::weekday::Weekday;

#[derive(Parser)]
#[command(name = "velometer")]
#[command(about = "Collect and query bike-share station availability", long_about = None)]
struct Cli {
    /// Root directory of the reading store (overrides VELOMETER_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed once and store readings for the tracked stations
    Ingest {
        /// Path to file or URL to fetch (defaults to VELOMETER_FEED_URL)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Sample the feed repeatedly, archiving and publishing once per day
    Collect {
        /// Sample rate: query the feed every X seconds
        #[arg(short = 'r', long, default_value_t = 300)]
        sample_rate: u64,

        /// Number of samples to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 1)]
        num_samples: usize,

        /// Optional: S3 bucket for the daily archive and aggregates
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Optional: Gzip compress CSV files before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Hourly averages and best window for one station and weekday
    Stats {
        /// Station name, e.g. "Obere Au" or "Kantonsspital Graubünden"
        #[arg(short, long)]
        station: String,

        /// Weekday: So..Sa, Sonntag..Samstag or 1..7 (Sunday = 1)
        #[arg(short, long)]
        weekday: String,

        /// First hour of the range, clamped to 0..23
        #[arg(long, allow_negative_numbers = true)]
        start_hour: Option<i64>,

        /// Last hour of the range, clamped to 0..23
        #[arg(long, allow_negative_numbers = true)]
        end_hour: Option<i64>,

        /// Length of the best window in hours (at least 1)
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<i64>,
    },
    /// Hourly averages of every station for one weekday
    Profile {
        /// Weekday: So..Sa, Sonntag..Samstag or 1..7 (Sunday = 1)
        #[arg(short, long)]
        weekday: String,
    },
    /// Latest reading per station
    Current {
        /// Only this station
        #[arg(short, long)]
        station: Option<String>,
    },
    /// Print every stored reading
    Dump,
    /// Recompute aggregates and upload them to S3
    Publish {
        /// S3 bucket name (defaults to VELOMETER_S3_BUCKET)
        #[arg(long)]
        s3_bucket: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/velometer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("velometer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().with_data_dir(cli.data_dir);
    let store = ReadingStore::from_config(&config);
    let pretty = cli.pretty;

    match cli.command {
        Commands::Ingest { source } => {
            let source = source.unwrap_or_else(|| config.feed_url.clone());
            let stored = ingest(&BasicClient::new(), &store, &source).await?;
            info!(stored, "Ingest finished");
        }
        Commands::Collect {
            sample_rate,
            num_samples,
            s3_bucket,
            gzip,
        } => {
            let s3_bucket = s3_bucket.or_else(|| config.s3_bucket.clone());
            collect(&config, sample_rate, num_samples, s3_bucket, gzip).await?;
        }
        Commands::Stats {
            station,
            weekday,
            start_hour,
            end_hour,
            hours,
        } => {
            let params = StatsParams {
                station,
                weekday,
                start_hour,
                end_hour,
                hours,
            };
            // validate before touching the store
            let query = StatsQuery::from_params(&params)?;
            let readings = store.load_station(query.station)?;
            let response = query.run(&readings);
            if response.best_window.is_empty() {
                info!(
                    station = %query.station,
                    weekday = %query.weekday,
                    hours = query.hours,
                    "No fully populated window in range"
                );
            }
            print_json(&response, pretty)?;
        }
        Commands::Profile { weekday } => {
            let weekday: Weekday = weekday.parse()?;
            let readings = store.load_all()?;
            print_json(&weekday_profile(&readings, weekday), pretty)?;
        }
        Commands::Current { station } => match station {
            Some(name) => {
                let station: Station = name.parse()?;
                let readings = store.load_station(station)?;
                print_json(&latest_for(&readings, station), pretty)?;
            }
            None => {
                let readings = store.load_all()?;
                print_json(&latest_per_station(&readings), pretty)?;
            }
        },
        Commands::Dump => {
            print_json(&store.load_all()?, pretty)?;
        }
        Commands::Publish { s3_bucket } => {
            let Some(bucket) = s3_bucket.or_else(|| config.s3_bucket.clone()) else {
                bail!("no S3 bucket given (use --s3-bucket or VELOMETER_S3_BUCKET)");
            };
            let aws = aws_config::load_from_env().await;
            let s3 = aws_sdk_s3::Client::new(&aws);
            publish(&s3, &bucket, &store).await?;
        }
    }

    Ok(())
}

/// Fetches the feed once and appends one reading per tracked station.
#[tracing::instrument(skip(client, store))]
async fn ingest<C: HttpClient>(client: &C, store: &ReadingStore, source: &str) -> Result<usize> {
    let bytes = load_source(client, source).await?;
    let readings = parse_feed(&bytes, Local::now().naive_local())?;

    if readings.is_empty() {
        warn!("Feed contained none of the tracked stations");
        return Ok(0);
    }

    store.append_all(&readings)
}

/// Samples the feed at a fixed interval. On the first sample of a new day,
/// uploads the previous day's partitions and refreshed aggregates to S3.
#[tracing::instrument(skip(config, s3_bucket), fields(data_dir = %config.data_dir.display()))]
async fn collect(
    config: &Config,
    sample_rate: u64,
    num_samples: usize,
    s3_bucket: Option<String>,
    gzip: bool,
) -> Result<()> {
    let s3_client = match s3_bucket {
        Some(ref bucket) => {
            info!(bucket = %bucket, gzip, "S3 upload enabled");
            let aws = aws_config::load_from_env().await;
            Some(aws_sdk_s3::Client::new(&aws))
        }
        None => None,
    };

    if num_samples == 0 {
        info!(sample_rate, "Sampling infinitely. Press Ctrl+C to stop.");
    } else {
        info!(num_samples, sample_rate, "Starting sample collection");
    }

    std::fs::create_dir_all(&config.data_dir)?;

    let client = BasicClient::new();
    let store = ReadingStore::from_config(config);
    let mut sample_count = 0;
    let mut last_upload_date: Option<chrono::NaiveDate> = None;

    loop {
        // 0 = infinite
        if num_samples > 0 && sample_count >= num_samples {
            break;
        }
        sample_count += 1;

        let today = Local::now().date_naive();
        if let (Some(bucket), Some(s3)) = (&s3_bucket, &s3_client) {
            if last_upload_date.is_none_or(|d| d < today) {
                if let Some(yesterday) = today.pred_opt() {
                    let s3 = s3.clone();
                    let bucket = bucket.clone();
                    let store = ReadingStore::from_config(config);
                    tokio::spawn(async move {
                        if let Err(e) = archive_date(&s3, &bucket, &store, yesterday, gzip).await {
                            error!(error = %e, date = %yesterday, "Failed to archive previous day's partitions");
                        }
                        if let Err(e) = publish(&s3, &bucket, &store).await {
                            error!(error = %e, "Failed to publish aggregates");
                        }
                    });
                    last_upload_date = Some(today);
                }
            }
        }

        info!(
            sample = sample_count,
            total = if num_samples == 0 {
                None
            } else {
                Some(num_samples)
            },
            "Starting sample round"
        );

        let fetch_start = std::time::Instant::now();
        match ingest(&client, &store, &config.feed_url).await {
            Ok(stored) => {
                let elapsed = fetch_start.elapsed();
                if elapsed.as_secs() > 15 {
                    warn!(elapsed_secs = elapsed.as_secs(), "Feed fetch was slow");
                }
                info!(stored, "Sample stored");
            }
            Err(e) => error!(error = %e, "Sample failed"),
        }

        if num_samples == 0 || sample_count < num_samples {
            info!(sample_rate, "Waiting before next sample");
            tokio::time::sleep(tokio::time::Duration::from_secs(sample_rate)).await;
        }
    }

    info!("Finished sampling");
    Ok(())
}
