use crate::analyzers::report::{ReportAssembler, Snapshot};
use crate::analyzers::types::Metric;
use crate::config::ReportConfig;
use anyhow::Result;
use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Top-level listing of a published report, uploaded as `<prefix>/index.json`.
#[derive(Debug, Serialize)]
pub struct ReportIndex {
    pub generated_at: DateTime<Utc>,
    pub observations: usize,
    /// Region names in order of first appearance in the dataset.
    pub regions: Vec<String>,
    pub files: Vec<String>,
}

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
///
/// With `gzip` set the body is compressed and tagged `Content-Encoding: gzip`.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> Result<()> {
    let body = encode_json(value, gzip)?;

    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type("application/json");
    if gzip {
        request = request.content_encoding("gzip");
    }
    request.send().await?;

    Ok(())
}

/// JSON bytes, optionally gzip-compressed.
pub fn encode_json(value: &impl Serialize, gzip: bool) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(value)?;
    if !gzip {
        return Ok(json);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

/// Uploads the summary table, the active and death rankings, the comparison
/// series, and an index under `prefix`.
pub async fn publish_report(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    prefix: &str,
    report: &ReportAssembler,
    config: &ReportConfig,
    gzip: bool,
) -> Result<ReportIndex> {
    let snapshot = report.snapshot();
    let prefix = prefix.trim_end_matches('/');
    let key = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        }
    };

    let mut files = Vec::new();

    let summary_key = key("summary.json");
    write_json_to_s3(client, bucket, &summary_key, snapshot.summary(), gzip).await?;
    files.push(summary_key);

    for metric in [Metric::Active, Metric::Deaths] {
        let ranked = report.get_ranked(metric, config.top_n);
        let ranked_key = key(&format!("top_{metric}.json"));
        write_json_to_s3(client, bucket, &ranked_key, &ranked, gzip).await?;
        files.push(ranked_key);
    }

    let series = report.get_series_grouped(&config.series_regions);
    let series_key = key("series.json");
    write_json_to_s3(client, bucket, &series_key, &series, gzip).await?;
    files.push(series_key);

    if let Some(vaccinations) = report.get_vaccinations(config.vaccine_preview_rows) {
        let vaccine_key = key("vaccinations.json");
        write_json_to_s3(client, bucket, &vaccine_key, &vaccinations, gzip).await?;
        files.push(vaccine_key);
    }

    let index = build_index(&snapshot, files);
    write_json_to_s3(client, bucket, &key("index.json"), &index, gzip).await?;

    info!(bucket, prefix, files = index.files.len(), "Report published");
    Ok(index)
}

fn build_index(snapshot: &Snapshot, files: Vec<String>) -> ReportIndex {
    let store = snapshot.store();
    ReportIndex {
        generated_at: Utc::now(),
        observations: store.len(),
        regions: store.regions().into_iter().map(str::to_string).collect(),
        files,
    }
}
