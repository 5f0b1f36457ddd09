//! The cleaned, immutable observation set every report reads from.

use crate::analyzers::types::{Observation, RawObservation};
use crate::analyzers::utility::parse_count;
use crate::dates::parse_date;
use crate::error::{Result, StoreError};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Cleaned observations in input order.
///
/// Built once; there is no way to mutate a store after construction. A data
/// refresh builds a new store.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    observations: Vec<Observation>,
}

/// Per-build counters, logged after every build.
#[derive(Debug, Default, PartialEq, Eq)]
struct BuildCounts {
    kept: usize,
    missing_region: usize,
    bad_dates: usize,
    coerced_counts: usize,
}

impl RecordStore {
    /// Cleans raw rows into a store.
    ///
    /// Unparseable dates become `None` and unparseable counts become `0`;
    /// rows without a region are dropped. The build only fails when a
    /// required field is absent from every row.
    pub fn build(raw_rows: Vec<RawObservation>) -> Result<Self> {
        check_required_fields(&raw_rows)?;

        let mut counts = BuildCounts::default();
        let mut observations = Vec::with_capacity(raw_rows.len());

        for (index, raw) in raw_rows.into_iter().enumerate() {
            let region = match raw.region.as_deref().map(str::trim) {
                Some(r) if !r.is_empty() => r.to_string(),
                _ => {
                    counts.missing_region += 1;
                    debug!(row = index, "Dropping row without region");
                    continue;
                }
            };

            let date = raw.date.as_deref().and_then(parse_date);
            if date.is_none() {
                counts.bad_dates += 1;
                debug!(row = index, raw_date = ?raw.date, "Unparseable date, keeping row");
            }

            let mut count = |field: &'static str, value: &Option<String>| -> i64 {
                match value.as_deref().and_then(parse_count) {
                    Some(n) => n,
                    None => {
                        counts.coerced_counts += 1;
                        debug!(row = index, field, raw = ?value, "Unparseable count, using 0");
                        0
                    }
                }
            };
            let confirmed = count("confirmed", &raw.confirmed);
            let cured = count("cured", &raw.cured);
            let deaths = count("deaths", &raw.deaths);

            observations.push(Observation::new(region, date, confirmed, cured, deaths));
        }

        counts.kept = observations.len();
        if counts.missing_region > 0 || counts.coerced_counts > 0 {
            warn!(
                dropped = counts.missing_region,
                coerced_counts = counts.coerced_counts,
                "Input contained irregular rows"
            );
        }
        info!(
            rows = counts.kept,
            bad_dates = counts.bad_dates,
            "Record store built"
        );

        Ok(Self { observations })
    }

    /// Wraps already-clean observations without further processing.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// All observations in insertion order.
    pub fn all(&self) -> &[Observation] {
        &self.observations
    }

    /// Observations whose region is in `regions`, in original relative order.
    ///
    /// Unknown regions simply match nothing.
    pub fn filter_by_regions<S: AsRef<str>>(&self, regions: &[S]) -> Vec<&Observation> {
        let wanted: HashSet<&str> = regions.iter().map(AsRef::as_ref).collect();
        self.observations
            .iter()
            .filter(|o| wanted.contains(o.region()))
            .collect()
    }

    /// Distinct regions in order of first appearance.
    pub fn regions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .map(Observation::region)
            .filter(|r| seen.insert(*r))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Fails when a required column has no value in any row.
fn check_required_fields(rows: &[RawObservation]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let fields: [(&'static str, fn(&RawObservation) -> bool); 5] = [
        ("region", |r| r.region.is_some()),
        ("date", |r| r.date.is_some()),
        ("confirmed", |r| r.confirmed.is_some()),
        ("cured", |r| r.cured.is_some()),
        ("deaths", |r| r.deaths.is_some()),
    ];

    for (field, present) in fields {
        if !rows.iter().any(present) {
            return Err(StoreError::MissingField { field });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(region: &str, date: &str, confirmed: &str, cured: &str, deaths: &str) -> RawObservation {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawObservation {
            region: opt(region),
            date: opt(date),
            confirmed: opt(confirmed),
            cured: opt(cured),
            deaths: opt(deaths),
        }
    }

    #[test]
    fn test_build_derives_active() {
        let store = RecordStore::build(vec![
            raw("Kerala", "2021-01-01", "10", "5", "1"),
            raw("Goa", "2021-01-01", "3", "4", "1"),
        ])
        .unwrap();

        assert_eq!(store.len(), 2);
        for obs in store.all() {
            assert_eq!(obs.active(), obs.confirmed() - (obs.cured() + obs.deaths()));
        }
        assert_eq!(store.all()[1].active(), -2);
    }

    #[test]
    fn test_bad_date_keeps_row() {
        let store = RecordStore::build(vec![
            raw("Kerala", "yesterday", "10", "5", "1"),
            raw("Kerala", "2021-01-02", "20", "15", "1"),
        ])
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].date(), None);
        assert_eq!(store.all()[1].date(), NaiveDate::from_ymd_opt(2021, 1, 2));
    }

    #[test]
    fn test_unparseable_count_becomes_zero() {
        let store = RecordStore::build(vec![raw("Kerala", "2021-01-01", "n/a", "5", "1")]).unwrap();
        assert_eq!(store.all()[0].confirmed(), 0);
        assert_eq!(store.all()[0].active(), -6);
    }

    #[test]
    fn test_extreme_counts_do_not_overflow_active() {
        let store = RecordStore::build(vec![
            raw("Kerala", "2021-01-01", "5", "9223372036854775807", "1"),
            raw("Kerala", "2021-01-02", "9223372036854775807", "1", "5"),
        ])
        .unwrap();
        assert_eq!(store.all()[0].cured(), i64::MAX);
        assert_eq!(store.all()[0].active(), 5 - i64::MAX);
        assert_eq!(store.all()[1].active(), i64::MAX - 6);
    }

    #[test]
    fn test_out_of_range_float_count_becomes_zero() {
        let rows = vec![raw("Kerala", "2021-01-01", "1e30", "0", "0")];
        let store = RecordStore::build(rows).unwrap();
        assert_eq!(store.all()[0].confirmed(), 0);
    }

    #[test]
    fn test_negative_counts_pass_through() {
        let store = RecordStore::build(vec![raw("Kerala", "2021-01-01", "-5", "0", "0")]).unwrap();
        assert_eq!(store.all()[0].confirmed(), -5);
    }

    #[test]
    fn test_row_without_region_is_dropped() {
        let store = RecordStore::build(vec![
            raw("", "2021-01-01", "1", "0", "0"),
            raw("Kerala", "2021-01-01", "1", "0", "0"),
        ])
        .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_field_absent_everywhere_is_fatal() {
        let err = RecordStore::build(vec![
            raw("Kerala", "2021-01-01", "1", "0", ""),
            raw("Goa", "2021-01-01", "1", "0", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::MissingField { field: "deaths" }));
    }

    #[test]
    fn test_empty_input_builds_empty_store() {
        let store = RecordStore::build(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert!(store.regions().is_empty());
    }

    #[test]
    fn test_filter_by_regions_preserves_order() {
        let store = RecordStore::from_observations(vec![
            Observation::new("Kerala", None, 1, 0, 0),
            Observation::new("Goa", None, 2, 0, 0),
            Observation::new("Maharashtra", None, 3, 0, 0),
            Observation::new("Kerala", None, 4, 0, 0),
        ]);

        let rows = store.filter_by_regions(&["Maharashtra", "Kerala", "Atlantis"]);
        let confirmed: Vec<i64> = rows.iter().map(|o| o.confirmed()).collect();
        assert_eq!(confirmed, vec![1, 3, 4]);
    }

    #[test]
    fn test_regions_first_seen_order() {
        let store = RecordStore::from_observations(vec![
            Observation::new("Kerala", None, 1, 0, 0),
            Observation::new("Goa", None, 2, 0, 0),
            Observation::new("Kerala", None, 4, 0, 0),
        ]);
        assert_eq!(store.regions(), vec!["Kerala", "Goa"]);
    }
}
