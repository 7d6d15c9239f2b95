use crate::libs::graph::{ContigGraph, ContigId};
use crate::libs::partition::hana::hana;
use crate::libs::partition::maru::maru;
use crate::libs::partition::profile::ContigInfo;
use crate::libs::partition::CoreGroup;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Population standard deviation of the group lengths. Lower is better.
///
/// ```
/// use hmr::libs::partition::search::partition_mark;
/// assert_eq!(partition_mark(&[2, 4, 4, 4, 5, 5, 7, 9]), 2.0);
/// assert_eq!(partition_mark(&[]), 0.0);
/// ```
pub fn partition_mark(lengths: &[u64]) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }
    let n = lengths.len() as f64;
    let mean = lengths.iter().map(|&l| l as f64).sum::<f64>() / n;
    let variance = lengths
        .iter()
        .map(|&l| {
            let d = l as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Window sizes to try, `[min(K, 3), max(K, max trust boundary)]`.
pub fn window_range(groups: usize, max_trust_boundary: usize) -> RangeInclusive<usize> {
    groups.min(3)..=groups.max(max_trust_boundary)
}

/// Outcome of one successful window trial.
#[derive(Debug, Clone)]
pub struct Trial {
    pub window: usize,
    pub groups: Vec<CoreGroup>,
    pub unassigned: Vec<ContigId>,
    pub mark: f64,
}

/// HANA followed by MARU for a single window size.
pub fn run_trial(
    window: usize,
    graph: &ContigGraph,
    infos: &[ContigInfo],
    best: &BTreeSet<ContigId>,
    target: usize,
) -> Option<Trial> {
    let mut groups = hana(window, graph, infos, best, target)?;
    let unassigned = maru(window, graph, infos, &mut groups);

    let lengths: Vec<u64> = groups.iter().map(|g| g.length).collect();
    let mark = partition_mark(&lengths);
    debug!(window, mark, "trial complete");

    Some(Trial {
        window,
        groups,
        unassigned,
        mark,
    })
}

/// Run trials in batches of `batch` windows on `pool`.
///
/// Results are walked in window order. The lowest mark wins and equal marks keep
/// the earlier window. The first mark higher than the current best stops the
/// sweep, including the rest of its batch. Failed trials are skipped.
pub fn search_windows<F>(
    windows: RangeInclusive<usize>,
    pool: &rayon::ThreadPool,
    batch: usize,
    trial: F,
) -> Option<Trial>
where
    F: Fn(usize) -> Option<Trial> + Sync,
{
    let windows: Vec<usize> = windows.collect();
    let mut best: Option<Trial> = None;

    for chunk in windows.chunks(batch.max(1)) {
        debug!(first = chunk[0], last = chunk[chunk.len() - 1], "trial batch");
        let results: Vec<Option<Trial>> = pool.install(|| chunk.par_iter().map(|&w| trial(w)).collect());

        for result in results.into_iter().flatten() {
            let current = best.as_ref().map(|t| t.mark);
            match current {
                Some(mark) if result.mark > mark => {
                    info!(
                        window = result.window,
                        mark = result.mark,
                        best = mark,
                        "mark bounced, stopping search"
                    );
                    return best;
                }
                Some(mark) if result.mark == mark => {}
                _ => best = Some(result),
            }
        }
    }
    best
}
