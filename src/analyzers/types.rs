//! Data types used by the aggregation pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single row deserialized from the observation CSV.
///
/// Every field is an optional string; coercion happens when the row enters a
/// [`RecordStore`](crate::analyzers::store::RecordStore).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "State/UnionTerritory", alias = "region")]
    pub region: Option<String>,
    #[serde(rename = "Date", alias = "date")]
    pub date: Option<String>,
    #[serde(rename = "Confirmed", alias = "confirmed")]
    pub confirmed: Option<String>,
    #[serde(rename = "Cured", alias = "cured")]
    pub cured: Option<String>,
    #[serde(rename = "Deaths", alias = "deaths")]
    pub deaths: Option<String>,
}

/// One cleaned row: a region's counters on one date.
///
/// `active` is derived on construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    region: String,
    date: Option<NaiveDate>,
    confirmed: i64,
    cured: i64,
    deaths: i64,
    active: i64,
}

impl Observation {
    /// Builds an observation and derives `active = confirmed - (cured + deaths)`.
    ///
    /// Negative results are kept as-is. The derivation saturates at the `i64`
    /// bounds instead of overflowing.
    pub fn new(
        region: impl Into<String>,
        date: Option<NaiveDate>,
        confirmed: i64,
        cured: i64,
        deaths: i64,
    ) -> Self {
        Self {
            region: region.into(),
            date,
            confirmed,
            cured,
            deaths,
            active: confirmed.saturating_sub(cured.saturating_add(deaths)),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn confirmed(&self) -> i64 {
        self.confirmed
    }

    pub fn cured(&self) -> i64 {
        self.cured
    }

    pub fn deaths(&self) -> i64 {
        self.deaths
    }

    pub fn active(&self) -> i64 {
        self.active
    }

    /// Reads the counter selected by `metric`.
    pub fn value(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Cured => self.cured,
            Metric::Deaths => self.deaths,
            Metric::Active => self.active,
        }
    }
}

/// Per-region pivot of the max-to-date counters and their derived rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSummary {
    pub region: String,
    pub confirmed_max: i64,
    pub cured_max: i64,
    pub deaths_max: i64,
    /// `None` when `confirmed_max == 0`.
    pub recovery_rate: Option<f64>,
    /// `None` when `confirmed_max == 0`.
    pub mortality_rate: Option<f64>,
}

/// One row of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub region: String,
    pub value: i64,
    pub date: Option<NaiveDate>,
}

/// Numeric observation fields a ranking can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Cured,
    Deaths,
    Active,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Cured => "cured",
            Metric::Deaths => "deaths",
            Metric::Active => "active",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(Metric::Confirmed),
            "cured" | "recovered" => Ok(Metric::Cured),
            "deaths" => Ok(Metric::Deaths),
            "active" | "active_cases" => Ok(Metric::Active),
            other => Err(format!("unknown metric '{other}'")),
        }
    }
}

/// How raw observations collapse to one row per region before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Row with the largest metric value; ties keep the first occurrence.
    #[default]
    MaxPerRegion,
    /// Row with the latest non-null date; ties keep the first occurrence.
    LatestPerRegion,
}

impl FromStr for Reduction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "maxperregion" => Ok(Reduction::MaxPerRegion),
            "latest" | "latestperregion" => Ok(Reduction::LatestPerRegion),
            other => Err(format!("unknown reduction '{other}'")),
        }
    }
}
