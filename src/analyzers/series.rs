//! Multi-region time series selection.

use crate::analyzers::store::RecordStore;
use crate::analyzers::types::Observation;
use serde::Serialize;

/// Regions compared on the default multi-series view.
pub const DEFAULT_SERIES_REGIONS: &[&str] = &[
    "Maharashtra",
    "Karnataka",
    "Kerala",
    "Tamil Nadu",
    "Uttar Pradesh",
];

/// All rows for one region, in store order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeries {
    pub region: String,
    pub points: Vec<Observation>,
}

/// Rows whose region is one of `regions`, in store order.
///
/// No re-sorting, resampling, or gap filling happens here; callers that
/// want chronological output must load chronologically ordered input.
pub fn select<'a, S: AsRef<str>>(store: &'a RecordStore, regions: &[S]) -> Vec<&'a Observation> {
    store.filter_by_regions(regions)
}

/// One series per requested region, in the caller's region order.
///
/// Unknown regions produce an empty series; repeated names are collapsed.
pub fn select_grouped<S: AsRef<str>>(store: &RecordStore, regions: &[S]) -> Vec<RegionSeries> {
    let mut series: Vec<RegionSeries> = Vec::with_capacity(regions.len());
    for region in regions {
        let region = region.as_ref();
        if series.iter().any(|s| s.region == region) {
            continue;
        }
        series.push(RegionSeries {
            region: region.to_string(),
            points: Vec::new(),
        });
    }

    for obs in select(store, regions) {
        if let Some(s) = series.iter_mut().find(|s| s.region == obs.region()) {
            s.points.push(obs.clone());
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        RecordStore::from_observations(vec![
            Observation::new("Kerala", None, 1, 0, 0),
            Observation::new("Maharashtra", None, 2, 0, 0),
            Observation::new("Goa", None, 3, 0, 0),
            Observation::new("Kerala", None, 4, 0, 0),
            Observation::new("Maharashtra", None, 5, 0, 0),
        ])
    }

    #[test]
    fn test_select_filters_in_original_order() {
        let store = store();
        let rows = select(&store, &["Kerala", "Maharashtra"]);

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|o| o.region() == "Kerala" || o.region() == "Maharashtra"));
        let confirmed: Vec<i64> = rows.iter().map(|o| o.confirmed()).collect();
        assert_eq!(confirmed, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_unknown_region_is_empty() {
        let store = store();
        assert!(select(&store, &["Atlantis"]).is_empty());
    }

    #[test]
    fn test_grouped_follows_request_order() {
        let store = store();
        let series = select_grouped(&store, &["Maharashtra", "Atlantis", "Kerala", "Maharashtra"]);

        let names: Vec<&str> = series.iter().map(|s| s.region.as_str()).collect();
        assert_eq!(names, vec!["Maharashtra", "Atlantis", "Kerala"]);
        assert_eq!(series[0].points.len(), 2);
        assert!(series[1].points.is_empty());
        assert_eq!(series[2].points[1].confirmed(), 4);
    }

    #[test]
    fn test_default_regions_on_store_without_them() {
        let store = store();
        let rows = select(&store, DEFAULT_SERIES_REGIONS);
        assert_eq!(rows.len(), 4);
    }
}
