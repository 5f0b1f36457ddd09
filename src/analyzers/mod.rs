//! Regional aggregation, ranking, and series selection.
//!
//! Raw observation rows are cleaned into a [`store::RecordStore`], pivoted
//! into per-region max-to-date summaries with recovery and mortality rates,
//! ranked by any counter, and filtered into per-region time series. The
//! [`report::ReportAssembler`] exposes those views to callers, and
//! [`writetos3`] publishes them as JSON.

pub mod aggregate;
pub mod rank;
pub mod report;
pub mod series;
pub mod store;
pub mod types;
pub mod utility;
pub mod writetos3;
