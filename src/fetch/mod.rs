//! Byte sources for input datasets: local files or HTTP(S) URLs.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::debug;

/// Downloads `url` through `client` and returns the response body.
///
/// Non-success statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    debug!(url, bytes = bytes.len(), "Fetched remote dataset");
    Ok(bytes)
}

/// Loads a dataset from a local path, or over HTTP when `source` is a URL.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn read_source(source: &str) -> Result<Bytes> {
    if is_url(source) {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await
    } else {
        let bytes = tokio::fs::read(source)
            .await
            .with_context(|| format!("reading '{source}'"))?;
        Ok(Bytes::from(bytes))
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.org/covid_19_india.csv"));
        assert!(is_url("http://localhost/data.csv"));
        assert!(!is_url("data/covid_19_india.csv"));
        assert!(!is_url("httpdata.csv"));
    }

    #[tokio::test]
    async fn test_read_local_file() {
        let path = format!("{}/epistat_test_source.csv", std::env::temp_dir().display());
        std::fs::write(&path, "region,date\n").unwrap();

        let bytes = read_source(&path).await.unwrap();
        assert_eq!(&bytes[..], b"region,date\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_read_missing_file_is_error() {
        assert!(read_source("/definitely/not/here.csv").await.is_err());
    }
}
