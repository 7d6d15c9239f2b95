use crate::libs::graph::ContigId;
use crate::libs::partition::heap::BoundedHeap;
use crate::libs::partition::profile::ContigInfo;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A directed view of a globally strong edge, as seen from `start`.
#[derive(Debug, Clone, Copy)]
pub struct TrustEdge {
    pub start: ContigId,
    pub end: ContigId,
    pub weight: f64,
}

impl TrustEdge {
    pub fn new(start: ContigId, end: ContigId, weight: f64) -> Self {
        Self { start, end, weight }
    }
}

// Stronger means heavier; among equal weights, smaller endpoints rank higher.
impl Ord for TrustEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.start.cmp(&self.start))
            .then_with(|| other.end.cmp(&self.end))
    }
}

impl PartialOrd for TrustEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TrustEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TrustEdge {}

/// A quarter of all contig pairs.
pub fn trust_edge_capacity(contigs: usize) -> usize {
    contigs.saturating_mul(contigs) >> 2
}

/// Scan every adjacency list through a bounded heap and return the strongest
/// edges, heaviest first.
pub fn collect_trust_edges(infos: &[ContigInfo], capacity: usize) -> Vec<TrustEdge> {
    let mut heap = BoundedHeap::new(capacity);
    for (id, info) in infos.iter().enumerate() {
        for edge in &info.edges {
            heap.push(TrustEdge::new(id, edge.id, edge.weight));
        }
    }
    heap.into_sorted_desc()
}

/// Walk the trust edges in order, taking both endpoints, until `target`
/// contigs are collected or the edges run out.
///
/// ```
/// use hmr::libs::partition::trust::{select_best_contigs, TrustEdge};
///
/// let edges = vec![TrustEdge::new(0, 1, 9.0), TrustEdge::new(1, 0, 9.0), TrustEdge::new(2, 3, 5.0)];
/// let best = select_best_contigs(&edges, 3);
/// assert_eq!(best.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
/// ```
pub fn select_best_contigs(trust_edges: &[TrustEdge], target: usize) -> BTreeSet<ContigId> {
    let mut best = BTreeSet::new();
    for edge in trust_edges {
        if best.len() >= target {
            break;
        }
        best.insert(edge.start);
        best.insert(edge.end);
    }
    best
}
