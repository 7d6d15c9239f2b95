//! Completion: attach the remaining contigs to core groups one at a time,
//! always committing the globally strongest contig/group pair first.

use crate::libs::graph::{ContigGraph, ContigId};
use crate::libs::partition::profile::ContigInfo;
use crate::libs::partition::CoreGroup;
use std::collections::BTreeSet;
use tracing::debug;

/// Per-group marks of one contig.
///
/// Walks the sorted adjacency list, counting at most `edge_limit` edges for each
/// group. Edges past the contig's trust boundary count half. `None` means the
/// contig has no counted edge into that group.
pub fn group_marks(
    info: &ContigInfo,
    edge_limit: usize,
    membership: &[Option<usize>],
    group_count: usize,
) -> Vec<Option<f64>> {
    let mut marks = vec![None; group_count];
    if edge_limit == 0 || group_count == 0 {
        return marks;
    }

    let mut counters = vec![0usize; group_count];
    let mut full = 0;
    for (pos, edge) in info.edges.iter().enumerate() {
        let Some(group) = membership[edge.id] else {
            continue;
        };
        if counters[group] >= edge_limit {
            continue;
        }

        let weight = if pos > info.trust_boundary {
            edge.weight / 2.0
        } else {
            edge.weight
        };
        *marks[group].get_or_insert(0.0) += weight;

        counters[group] += 1;
        if counters[group] == edge_limit {
            full += 1;
            if full == group_count {
                break;
            }
        }
    }
    marks
}

/// The group with the highest positive mark, lowest index on ties.
pub fn best_group(marks: &[Option<f64>]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (group, mark) in marks.iter().enumerate() {
        let Some(mark) = *mark else {
            continue;
        };
        if mark > 0.0 && best.map_or(true, |(_, m)| mark > m) {
            best = Some((group, mark));
        }
    }
    best
}

/// Assign unclassified contigs to `groups` in place.
///
/// Each round scores every pending contig against every group and commits the
/// single best pair. Stops when no pending contig has a positive mark. Returns
/// the contigs left unassigned, ascending.
pub fn maru(window: usize, graph: &ContigGraph, infos: &[ContigInfo], groups: &mut [CoreGroup]) -> Vec<ContigId> {
    let mut membership: Vec<Option<usize>> = vec![None; graph.len()];
    for (index, group) in groups.iter().enumerate() {
        for &id in &group.ids {
            membership[id] = Some(index);
        }
    }

    let mut pending: BTreeSet<ContigId> = (0..graph.len()).filter(|&id| membership[id].is_none()).collect();
    debug!(window, contigs = pending.len(), "MARU stage start");

    // Cached per-contig choice, refreshed when a neighbour joins a group or
    // the smallest group grows.
    let mut cached: Vec<Option<(usize, f64)>> = vec![None; graph.len()];
    let mut stale: Vec<bool> = vec![true; graph.len()];
    let mut edge_limit = groups.iter().map(CoreGroup::size).min().unwrap_or(0);

    while !pending.is_empty() {
        let mut choice: Option<(ContigId, usize, f64)> = None;
        for &id in &pending {
            if stale[id] {
                let marks = group_marks(&infos[id], edge_limit, &membership, groups.len());
                cached[id] = best_group(&marks);
                stale[id] = false;
            }
            if let Some((group, mark)) = cached[id] {
                if choice.map_or(true, |(_, _, m)| mark > m) {
                    choice = Some((id, group, mark));
                }
            }
        }

        let Some((id, group, _)) = choice else {
            break;
        };
        groups[group].insert(id, graph.contig(id).length);
        membership[id] = Some(group);
        pending.remove(&id);

        let limit = groups.iter().map(CoreGroup::size).min().unwrap_or(0);
        if limit != edge_limit {
            edge_limit = limit;
            stale.iter_mut().for_each(|s| *s = true);
        } else {
            for edge in &infos[id].edges {
                stale[edge.id] = true;
            }
        }
    }

    debug!(window, unassigned = pending.len(), "MARU stage complete");
    pending.into_iter().collect()
}
