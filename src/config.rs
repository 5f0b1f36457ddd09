use crate::analyzers::series::DEFAULT_SERIES_REGIONS;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming the optional JSON config file.
pub const CONFIG_ENV: &str = "EPISTAT_CONFIG";

/// Report defaults, overridable from a JSON file and then from CLI flags.
///
/// Stored as a plain JSON object on disk; every key is optional:
/// ```json
/// {
///   "series_regions": ["Kerala", "Maharashtra"],
///   "top_n": 10,
///   "vaccine_preview_rows": 11
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub series_regions: Vec<String>,
    pub top_n: usize,
    pub vaccine_preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            series_regions: DEFAULT_SERIES_REGIONS.iter().map(|r| r.to_string()).collect(),
            top_n: 10,
            vaccine_preview_rows: 11,
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("parsing config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads from `$EPISTAT_CONFIG` when set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim()),
            _ => Ok(Self::default()),
        }
    }
}
