//! Read-only query façade handed to the presentation layer.
//!
//! A [`Snapshot`] pairs a [`RecordStore`] with the summary table computed
//! from it. [`ReportAssembler`] serves queries from the current snapshot and
//! replaces it wholesale on refresh, so a reader never sees a half-updated
//! dataset.

use crate::analyzers::aggregate::{SummaryTable, summarize};
use crate::analyzers::rank::top_n;
use crate::analyzers::series::{RegionSeries, select, select_grouped};
use crate::analyzers::store::RecordStore;
use crate::analyzers::types::{Metric, Observation, RankedEntry, Reduction};
use crate::loader::VaccinationTable;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// An immutable store plus its summary table.
#[derive(Debug, Clone)]
pub struct Snapshot {
    store: RecordStore,
    summary: SummaryTable,
    vaccinations: Option<Arc<VaccinationTable>>,
}

impl Snapshot {
    pub fn new(store: RecordStore) -> Self {
        let summary = summarize(&store);
        Self {
            store,
            summary,
            vaccinations: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn summary(&self) -> &SummaryTable {
        &self.summary
    }

    pub fn ranked(&self, metric: Metric, n: usize, reduction: Reduction) -> Vec<RankedEntry> {
        top_n(&self.store, metric, n, reduction)
    }

    pub fn series<S: AsRef<str>>(&self, regions: &[S]) -> Vec<&Observation> {
        select(&self.store, regions)
    }

    pub fn series_grouped<S: AsRef<str>>(&self, regions: &[S]) -> Vec<RegionSeries> {
        select_grouped(&self.store, regions)
    }

    pub fn vaccinations(&self) -> Option<&VaccinationTable> {
        self.vaccinations.as_deref()
    }
}

/// Serves report queries from the current [`Snapshot`].
///
/// Every getter works on whichever snapshot was current when it was called;
/// [`refresh`](Self::refresh) swaps in a new one atomically.
#[derive(Debug)]
pub struct ReportAssembler {
    current: RwLock<Arc<Snapshot>>,
}

impl ReportAssembler {
    pub fn new(store: RecordStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::new(store))),
        }
    }

    /// Attaches the vaccination dataset, which is passed through untouched.
    ///
    /// Snapshots handed out earlier keep their contents; the store is only
    /// cloned if one of them is still alive.
    pub fn with_vaccinations(self, vaccinations: VaccinationTable) -> Self {
        let current = self
            .current
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = Arc::unwrap_or_clone(current);
        next.vaccinations = Some(Arc::new(vaccinations));
        Self {
            current: RwLock::new(Arc::new(next)),
        }
    }

    /// The snapshot current at the time of the call.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds a snapshot from `store` and makes it current.
    ///
    /// The summary is computed before the lock is taken; readers holding the
    /// previous snapshot keep it until they drop it.
    pub fn refresh(&self, store: RecordStore) {
        let mut next = Snapshot::new(store);
        next.vaccinations = self.snapshot().vaccinations.clone();
        let next = Arc::new(next);

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
        info!("Report snapshot refreshed");
    }

    /// The full summary table in `confirmed_max` descending order.
    pub fn get_summary_table(&self) -> SummaryTable {
        self.snapshot().summary.clone()
    }

    /// Top `n` regions by `metric`, reduced to each region's peak row.
    pub fn get_ranked(&self, metric: Metric, n: usize) -> Vec<RankedEntry> {
        self.get_ranked_with(metric, n, Reduction::MaxPerRegion)
    }

    pub fn get_ranked_with(
        &self,
        metric: Metric,
        n: usize,
        reduction: Reduction,
    ) -> Vec<RankedEntry> {
        self.snapshot().ranked(metric, n, reduction)
    }

    /// Rows for `regions` in store order.
    pub fn get_series<S: AsRef<str>>(&self, regions: &[S]) -> Vec<Observation> {
        self.snapshot().series(regions).into_iter().cloned().collect()
    }

    /// Rows for `regions`, one series per region.
    pub fn get_series_grouped<S: AsRef<str>>(&self, regions: &[S]) -> Vec<RegionSeries> {
        self.snapshot().series_grouped(regions)
    }

    /// The first `n` vaccination rows, if that dataset was attached.
    pub fn get_vaccinations(&self, n: usize) -> Option<VaccinationTable> {
        self.snapshot().vaccinations().map(|v| v.head(n))
    }
}
