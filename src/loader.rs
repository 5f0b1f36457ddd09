//! CSV decoding for the observation and vaccination datasets.

use crate::analyzers::types::RawObservation;
use crate::error::Result;
use serde::Serialize;
use tracing::debug;

/// Decodes observation rows from CSV bytes with a header line.
pub fn read_observations(bytes: &[u8]) -> Result<Vec<RawObservation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: RawObservation = result?;
        rows.push(record);
    }

    debug!(rows = rows.len(), "Observation CSV decoded");
    Ok(rows)
}

/// The vaccination dataset, kept verbatim for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VaccinationTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl VaccinationTable {
    /// Decodes the table from CSV bytes without interpreting any column.
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(rows = rows.len(), "Vaccination CSV decoded");
        Ok(Self { headers, rows })
    }

    /// The first `n` rows, unmodified.
    pub fn head(&self, n: usize) -> VaccinationTable {
        VaccinationTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
