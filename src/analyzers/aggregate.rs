use crate::analyzers::store::RecordStore;
use crate::analyzers::types::RegionalSummary;
use crate::analyzers::utility::rate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Regional summaries ordered by `confirmed_max` descending.
///
/// The order is part of the contract: "top" views read the head of the
/// table without sorting again.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SummaryTable {
    rows: Vec<RegionalSummary>,
}

impl SummaryTable {
    pub fn rows(&self) -> &[RegionalSummary] {
        &self.rows
    }

    /// Looks up one region's summary.
    pub fn get(&self, region: &str) -> Option<&RegionalSummary> {
        self.rows.iter().find(|s| s.region == region)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionalSummary> {
        self.rows.iter()
    }
}

#[derive(Default)]
struct MaxAcc {
    confirmed: i64,
    cured: i64,
    deaths: i64,
}

/// Pivots the store into one [`RegionalSummary`] per region.
///
/// Each counter is the maximum seen for the region across all rows, not the
/// value on the latest date, so duplicate or out-of-order rows do not skew
/// the result. Rates are `None` when `confirmed_max` is zero. Every call
/// recomputes the whole table.
pub fn summarize(store: &RecordStore) -> SummaryTable {
    // BTreeMap keeps regions alphabetical before the stable sort, so ties on
    // confirmed_max come out in name order.
    let mut groups: BTreeMap<&str, MaxAcc> = BTreeMap::new();

    for obs in store.all() {
        match groups.get_mut(obs.region()) {
            Some(acc) => {
                acc.confirmed = acc.confirmed.max(obs.confirmed());
                acc.cured = acc.cured.max(obs.cured());
                acc.deaths = acc.deaths.max(obs.deaths());
            }
            None => {
                groups.insert(
                    obs.region(),
                    MaxAcc {
                        confirmed: obs.confirmed(),
                        cured: obs.cured(),
                        deaths: obs.deaths(),
                    },
                );
            }
        }
    }

    let mut rows: Vec<RegionalSummary> = groups
        .into_iter()
        .map(|(region, acc)| RegionalSummary {
            region: region.to_string(),
            confirmed_max: acc.confirmed,
            cured_max: acc.cured,
            deaths_max: acc.deaths,
            recovery_rate: rate(acc.cured, acc.confirmed),
            mortality_rate: rate(acc.deaths, acc.confirmed),
        })
        .collect();

    rows.sort_by(|a, b| b.confirmed_max.cmp(&a.confirmed_max));

    debug!(regions = rows.len(), "Summary table computed");
    SummaryTable { rows }
}
