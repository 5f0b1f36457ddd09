//! CLI entry point for the epistat report tool.
//!
//! Loads a regional observation dataset from a file or URL and prints the
//! summary table, a top-N ranking, or comparison series, or publishes every
//! view as JSON to S3.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use epistat::analyzers::report::ReportAssembler;
use epistat::analyzers::store::RecordStore;
use epistat::analyzers::types::{Metric, Reduction};
use epistat::analyzers::writetos3::publish_report;
use epistat::config::ReportConfig;
use epistat::fetch::read_source;
use epistat::loader::{VaccinationTable, read_observations};
use epistat::output::{Format, emit, table_to_csv_string, write_out};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "epistat")]
#[command(about = "Regional epidemiological summaries and rankings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Observation CSV: path to file or URL to fetch
    #[arg(short, long, value_name = "FILE_OR_URL")]
    input: String,
}

#[derive(Args)]
struct OutputArgs {
    /// Rendering of the result set
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    format: Format,

    /// File to write to instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-region max-to-date counters with recovery and mortality rates
    Summary {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Top regions by one counter
    Rank {
        #[command(flatten)]
        input: InputArgs,

        /// Counter to rank by: active, deaths, confirmed, cured
        #[arg(short, long, default_value = "active")]
        metric: Metric,

        /// Number of regions to return (defaults to the configured top_n)
        #[arg(short)]
        n: Option<usize>,

        /// Row chosen per region before ranking: max or latest
        #[arg(short, long, default_value = "max")]
        reduction: Reduction,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Rows for a fixed set of regions, in input order
    Series {
        #[command(flatten)]
        input: InputArgs,

        /// Comma-separated regions (defaults to the configured series_regions)
        #[arg(long, value_delimiter = ',')]
        regions: Vec<String>,

        /// Group rows into one series per region (ignored for CSV)
        #[arg(short, long, default_value_t = false)]
        grouped: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// First rows of the vaccination dataset, unmodified
    Vaccine {
        /// Vaccination CSV: path to file or URL to fetch
        #[arg(short, long, value_name = "FILE_OR_URL")]
        input: String,

        /// Number of rows to show (defaults to the configured vaccine_preview_rows)
        #[arg(short, long)]
        rows: Option<usize>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Compute every view and upload them as JSON to S3
    Publish {
        #[command(flatten)]
        input: InputArgs,

        /// Optional vaccination CSV to include
        #[arg(long, value_name = "FILE_OR_URL")]
        vaccine: Option<String>,

        /// S3 bucket name to upload report JSON to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: String,

        /// Key prefix inside the bucket
        #[arg(long, default_value = "reports")]
        prefix: String,

        /// Gzip compress JSON bodies before uploading
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/epistat.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("epistat.log"));

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
    let config = ReportConfig::from_env()?;
    debug!(?config, "Report config loaded");

    match cli.command {
        Commands::Summary { input, out } => {
            let report = load_report(&input.input).await?;
            let table = report.get_summary_table();
            emit(table.rows(), out.format, out.output.as_deref())?;
        }
        Commands::Rank {
            input,
            metric,
            n,
            reduction,
            out,
        } => {
            let report = load_report(&input.input).await?;
            let n = n.unwrap_or(config.top_n);
            let ranked = report.get_ranked_with(metric, n, reduction);
            info!(%metric, n, returned = ranked.len(), "Ranking computed");
            emit(&ranked, out.format, out.output.as_deref())?;
        }
        Commands::Series {
            input,
            regions,
            grouped,
            out,
        } => {
            let report = load_report(&input.input).await?;
            let regions = if regions.is_empty() {
                config.series_regions.clone()
            } else {
                regions
            };
            if grouped && out.format != Format::Csv {
                let series = report.get_series_grouped(&regions);
                emit(&series, out.format, out.output.as_deref())?;
            } else {
                let rows = report.get_series(&regions);
                info!(regions = regions.len(), rows = rows.len(), "Series selected");
                emit(&rows, out.format, out.output.as_deref())?;
            }
        }
        Commands::Vaccine { input, rows, out } => {
            let table = load_vaccinations(&input).await?;
            let head = table.head(rows.unwrap_or(config.vaccine_preview_rows));
            let rendered = match out.format {
                Format::Pretty => format!("{:#?}\n", head),
                Format::Json => serde_json::to_string_pretty(&head)? + "\n",
                Format::Csv => table_to_csv_string(&head)?,
            };
            write_out(&rendered, out.output.as_deref())?;
        }
        Commands::Publish {
            input,
            vaccine,
            s3_bucket,
            prefix,
            gzip,
        } => {
            if s3_bucket.is_empty() {
                info!("S3 bucket not specified, skipping upload");
                return Ok(());
            }

            let mut report = load_report(&input.input).await?;
            if let Some(vaccine) = vaccine {
                report = report.with_vaccinations(load_vaccinations(&vaccine).await?);
            }

            let aws = aws_config::load_from_env().await;
            let s3 = aws_sdk_s3::Client::new(&aws);
            let index = publish_report(&s3, &s3_bucket, &prefix, &report, &config, gzip).await?;
            info!(bucket = %s3_bucket, files = index.files.len(), "Publish complete");
        }
    }

    Ok(())
}

/// Loads, cleans, and summarizes the observation dataset.
#[tracing::instrument]
async fn load_report(source: &str) -> Result<ReportAssembler> {
    let bytes = read_source(source).await?;
    let raw = read_observations(&bytes).with_context(|| format!("decoding '{source}'"))?;
    let store =
        RecordStore::build(raw).with_context(|| format!("building records from '{source}'"))?;
    Ok(ReportAssembler::new(store))
}

#[tracing::instrument]
async fn load_vaccinations(source: &str) -> Result<VaccinationTable> {
    let bytes = read_source(source).await?;
    let table = VaccinationTable::from_csv(&bytes).with_context(|| format!("decoding '{source}'"))?;
    Ok(table)
}
