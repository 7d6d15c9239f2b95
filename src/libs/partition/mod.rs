//! Partitioning of a Hi-C contig graph into a fixed number of groups.
//!
//! The driver profiles every contig, selects the contigs joined by the strongest
//! edges, then tries a range of window sizes in parallel. Each trial builds core
//! groups ([`hana`]) and completes them ([`maru`]); the trial whose group lengths
//! are most even wins.

pub mod hana;
pub mod heap;
pub mod maru;
pub mod profile;
pub mod search;
pub mod trust;

use crate::libs::graph::{ContigGraph, ContigId};
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    #[error("no partition into {groups} groups was found for any window size")]
    NoPartition { groups: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Number of groups wanted.
    pub groups: usize,
    /// Worker threads, also the number of windows tried per batch. 0 means all cores.
    pub threads: usize,
}

impl PartitionConfig {
    pub fn new(groups: usize, threads: usize) -> Self {
        Self { groups, threads }
    }
}

/// A set of contig ids with the running sum of their lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreGroup {
    pub ids: BTreeSet<ContigId>,
    pub length: u64,
}

impl CoreGroup {
    pub fn new(ids: BTreeSet<ContigId>, graph: &ContigGraph) -> Self {
        let length = ids.iter().map(|&id| graph.contig(id).length).sum();
        Self { ids, length }
    }

    /// Number of member contigs.
    pub fn size(&self) -> usize {
        self.ids.len()
    }

    pub fn insert(&mut self, id: ContigId, length: u64) {
        if self.ids.insert(id) {
            self.length += length;
        }
    }

    pub fn absorb(&mut self, other: CoreGroup) {
        self.ids.extend(other.ids);
        self.length += other.length;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionResult {
    pub groups: Vec<BTreeSet<ContigId>>,
    /// Contigs not reachable from any group, ascending.
    pub unassigned: Vec<ContigId>,
    /// Winning window size, if a window search ran.
    pub window: Option<usize>,
    pub mark: Option<f64>,
}

impl PartitionResult {
    fn single(contigs: usize) -> Self {
        Self {
            groups: vec![(0..contigs).collect()],
            unassigned: vec![],
            window: None,
            mark: None,
        }
    }

    fn unassigned(contigs: usize) -> Self {
        Self {
            groups: vec![],
            unassigned: (0..contigs).collect(),
            window: None,
            mark: None,
        }
    }

    fn from_trial(trial: search::Trial) -> Self {
        Self {
            groups: trial.groups.into_iter().map(|g| g.ids).collect(),
            unassigned: trial.unassigned,
            window: Some(trial.window),
            mark: Some(trial.mark),
        }
    }

    pub fn assigned(&self) -> usize {
        self.groups.iter().map(BTreeSet::len).sum()
    }

    pub fn group_lengths(&self, graph: &ContigGraph) -> Vec<u64> {
        self.groups
            .iter()
            .map(|g| g.iter().map(|&id| graph.contig(id).length).sum())
            .collect()
    }
}

/// Partition `graph` into `config.groups` groups.
///
/// Fewer than two groups returns every contig in one group. A graph without any
/// edge returns no groups and leaves every contig unassigned.
pub fn partition(graph: &ContigGraph, config: &PartitionConfig) -> Result<PartitionResult, PartitionError> {
    let n = graph.len();
    if config.groups < 2 {
        info!(contigs = n, "single group requested");
        return Ok(PartitionResult::single(n));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let threads = pool.current_num_threads();

    info!(contigs = n, edges = graph.edge_count(), "profiling contigs");
    let infos = pool.install(|| profile::profile_contigs(graph));
    let max_trust = profile::max_trust_boundary(&infos);

    let trust_edges = trust::collect_trust_edges(&infos, trust::trust_edge_capacity(n));
    info!(edges = trust_edges.len(), max_trust, "trust edges collected");

    let best = trust::select_best_contigs(&trust_edges, n / 2);
    info!(contigs = best.len(), "best contigs selected");
    if best.is_empty() {
        warn!("no linked contigs, leaving every contig unassigned");
        return Ok(PartitionResult::unassigned(n));
    }

    let windows = search::window_range(config.groups, max_trust);
    info!(
        first = windows.start(),
        last = windows.end(),
        threads,
        "searching window sizes"
    );
    let trial = search::search_windows(windows, &pool, threads, |window| {
        search::run_trial(window, graph, &infos, &best, config.groups)
    });

    match trial {
        Some(trial) => {
            info!(
                window = trial.window,
                mark = trial.mark,
                unassigned = trial.unassigned.len(),
                "partition found"
            );
            Ok(PartitionResult::from_trial(trial))
        }
        None => Err(PartitionError::NoPartition {
            groups: config.groups,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::graph::{Contig, EdgeRecord};

    fn two_triples() -> ContigGraph {
        let contigs = (0..6).map(|i| Contig::new(&format!("c{}", i), 100)).collect();
        ContigGraph::from_records(
            contigs,
            &[
                EdgeRecord::new(0, 1, 10.0),
                EdgeRecord::new(1, 2, 9.0),
                EdgeRecord::new(2, 3, 1.0),
                EdgeRecord::new(3, 4, 10.0),
                EdgeRecord::new(4, 5, 9.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_partition_two_triples() {
        let graph = two_triples();
        for threads in [1, 3] {
            let result = partition(&graph, &PartitionConfig::new(2, threads)).unwrap();
            assert_eq!(
                result.groups,
                vec![BTreeSet::from([0, 1, 2]), BTreeSet::from([3, 4, 5])]
            );
            assert!(result.unassigned.is_empty());
            assert_eq!(result.window, Some(2));
            assert_eq!(result.mark, Some(0.0));
            assert_eq!(result.group_lengths(&graph), vec![300, 300]);
        }
    }

    #[test]
    fn test_partition_single_group() {
        let graph = two_triples();
        let result = partition(&graph, &PartitionConfig::new(1, 1)).unwrap();
        assert_eq!(result.groups, vec![(0..6).collect::<BTreeSet<_>>()]);
        assert_eq!(result.assigned(), 6);
        assert!(result.window.is_none());
    }

    #[test]
    fn test_partition_without_edges() {
        let contigs = (0..4).map(|i| Contig::new(&format!("c{}", i), 5)).collect();
        let graph = ContigGraph::new(contigs);
        let result = partition(&graph, &PartitionConfig::new(2, 1)).unwrap();
        assert!(result.groups.is_empty());
        assert_eq!(result.unassigned, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_partition_too_many_groups() {
        let err = partition(&two_triples(), &PartitionConfig::new(3, 2)).unwrap_err();
        assert!(matches!(err, PartitionError::NoPartition { groups: 3 }));
    }

    #[test]
    fn test_core_group_insert() {
        let graph = two_triples();
        let mut group = CoreGroup::new(BTreeSet::from([0]), &graph);
        group.insert(1, 100);
        group.insert(1, 100);
        assert_eq!(group.size(), 2);
        assert_eq!(group.length, 200);
    }

    fn graph_of(n: usize, records: &[EdgeRecord]) -> ContigGraph {
        let contigs = (0..n).map(|i| Contig::new(&format!("c{}", i), 10)).collect();
        ContigGraph::from_records(contigs, records).unwrap()
    }

    #[test]
    fn test_partition_skips_collapsed_window() {
        // window 2 merges into the single kernel {1, 3}; only window 3 reaches two groups
        let graph = graph_of(
            10,
            &[
                EdgeRecord::new(0, 1, 5.0),
                EdgeRecord::new(0, 2, 16.0),
                EdgeRecord::new(1, 2, 9.0),
                EdgeRecord::new(1, 3, 18.0),
                EdgeRecord::new(2, 3, 12.0),
                EdgeRecord::new(4, 5, 6.0),
                EdgeRecord::new(4, 7, 18.0),
                EdgeRecord::new(5, 7, 12.0),
                EdgeRecord::new(6, 7, 9.0),
                EdgeRecord::new(3, 4, 1.0),
                EdgeRecord::new(1, 8, 3.0),
                EdgeRecord::new(4, 9, 4.0),
            ],
        );
        for threads in [1, 2] {
            let result = partition(&graph, &PartitionConfig::new(2, threads)).unwrap();
            assert_eq!(
                result.groups,
                vec![BTreeSet::from([0, 1, 2, 3, 8]), BTreeSet::from([4, 5, 6, 7, 9])]
            );
            assert!(result.unassigned.is_empty());
            assert_eq!(result.window, Some(3));
            assert_eq!(result.mark, Some(0.0));
        }
    }

    #[test]
    fn test_partition_from_merged_intersections() {
        // two 4-cliques with pendants; window 2 yields kernels {1, 3} and {5, 7}
        let graph = graph_of(
            14,
            &[
                EdgeRecord::new(0, 2, 17.0),
                EdgeRecord::new(0, 3, 10.0),
                EdgeRecord::new(1, 2, 16.0),
                EdgeRecord::new(1, 3, 17.0),
                EdgeRecord::new(2, 3, 11.0),
                EdgeRecord::new(4, 5, 11.0),
                EdgeRecord::new(4, 6, 19.0),
                EdgeRecord::new(4, 7, 11.0),
                EdgeRecord::new(5, 6, 6.0),
                EdgeRecord::new(5, 7, 16.0),
                EdgeRecord::new(6, 7, 10.0),
                EdgeRecord::new(3, 4, 1.0),
                EdgeRecord::new(0, 8, 3.0),
                EdgeRecord::new(4, 9, 4.0),
                EdgeRecord::new(8, 10, 2.0),
                EdgeRecord::new(6, 11, 4.0),
                EdgeRecord::new(6, 12, 3.0),
                EdgeRecord::new(8, 13, 2.0),
            ],
        );
        let infos = profile::profile_contigs(&graph);
        let best = BTreeSet::from([0, 1, 2, 3, 4, 5, 6, 7]);
        let kernels = hana::hana(2, &graph, &infos, &best, 2).unwrap();
        assert_eq!(kernels[0].ids, BTreeSet::from([1, 3]));
        assert_eq!(kernels[1].ids, BTreeSet::from([5, 7]));

        for threads in [1, 3] {
            let result = partition(&graph, &PartitionConfig::new(2, threads)).unwrap();
            assert_eq!(
                result.groups,
                vec![
                    BTreeSet::from([0, 1, 2, 3, 8, 10, 13]),
                    BTreeSet::from([4, 5, 6, 7, 9, 11, 12])
                ]
            );
            assert!(result.unassigned.is_empty());
            assert_eq!(result.window, Some(2));
            assert_eq!(result.mark, Some(0.0));
        }
    }
}
