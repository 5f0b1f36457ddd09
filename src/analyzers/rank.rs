//! Top-N regional rankings over raw observations.

use crate::analyzers::store::RecordStore;
use crate::analyzers::types::{Metric, Observation, RankedEntry, Reduction};
use std::collections::HashMap;

/// Ranks regions by `metric`, returning at most `n` entries.
///
/// Observations first collapse to one row per region according to
/// `reduction`; the survivors are ordered by metric value descending, with
/// ties going to the row that appears earlier in the input. Fewer than `n`
/// regions yields all of them.
pub fn top_n(
    store: &RecordStore,
    metric: Metric,
    n: usize,
    reduction: Reduction,
) -> Vec<RankedEntry> {
    let mut picked = reduce(store.all(), metric, reduction);

    picked.sort_by(|(ia, a), (ib, b)| {
        b.value(metric)
            .cmp(&a.value(metric))
            .then_with(|| ia.cmp(ib))
    });

    picked
        .into_iter()
        .take(n)
        .map(|(_, obs)| RankedEntry {
            region: obs.region().to_string(),
            value: obs.value(metric),
            date: obs.date(),
        })
        .collect()
}

/// Picks one `(row index, observation)` per region.
fn reduce(
    rows: &[Observation],
    metric: Metric,
    reduction: Reduction,
) -> Vec<(usize, &Observation)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut picked: Vec<(usize, &Observation)> = Vec::new();

    for (index, obs) in rows.iter().enumerate() {
        let Some(slot) = slots.get(obs.region()).copied() else {
            slots.insert(obs.region(), picked.len());
            picked.push((index, obs));
            continue;
        };

        let current = picked[slot].1;
        let replace = match reduction {
            Reduction::MaxPerRegion => obs.value(metric) > current.value(metric),
            // Option ordering puts None below any date
            Reduction::LatestPerRegion => obs.date() > current.date(),
        };
        if replace {
            picked[slot] = (index, obs);
        }
    }

    picked
}
