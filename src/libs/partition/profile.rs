use crate::libs::graph::{ContigEdge, ContigGraph, ContigId};
use fxhash::FxHashMap;
use rayon::prelude::*;

/// Derived, read-only view of one contig's neighbourhood.
#[derive(Debug, Clone)]
pub struct ContigInfo {
    /// Adjacency list sorted by descending weight, ties by ascending id.
    pub edges: Vec<ContigEdge>,
    /// Edges at an index greater than this are treated as noisy.
    pub trust_boundary: usize,
    /// Neighbour id to weight.
    pub edge_weight: FxHashMap<ContigId, f64>,
}

impl ContigInfo {
    pub fn weight(&self, id: ContigId) -> Option<f64> {
        self.edge_weight.get(&id).copied()
    }
}

/// Descending by weight; equal weights keep the smaller neighbour id first.
pub fn sort_edges(edges: &mut [ContigEdge]) {
    edges.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));
}

/// Position of the largest first derivative of a descending weight list, plus one.
///
/// Lists with two or fewer weights always get 1. On ties the first maximum wins.
///
/// ```
/// use hmr::libs::partition::profile::trust_boundary;
/// assert_eq!(trust_boundary(&[10.0, 9.0, 1.0, 0.5]), 3);
/// assert_eq!(trust_boundary(&[10.0, 8.0, 7.0]), 2);
/// assert_eq!(trust_boundary(&[3.0]), 1);
/// ```
pub fn trust_boundary(weights: &[f64]) -> usize {
    if weights.len() <= 2 {
        return 1;
    }
    let mut best_pos = 0;
    let mut best_diff = f64::NEG_INFINITY;
    for (pos, pair) in weights.windows(2).enumerate() {
        let diff = pair[1] - pair[0];
        if diff > best_diff {
            best_diff = diff;
            best_pos = pos;
        }
    }
    best_pos + 1
}

pub fn profile_contig(edges: &[ContigEdge]) -> ContigInfo {
    let mut edges = edges.to_vec();
    sort_edges(&mut edges);

    let weights: Vec<f64> = edges.iter().map(|e| e.weight).collect();
    let trust_boundary = trust_boundary(&weights);
    let edge_weight = edges.iter().map(|e| (e.id, e.weight)).collect();

    ContigInfo {
        edges,
        trust_boundary,
        edge_weight,
    }
}

/// Profile every contig of the graph. The result is indexed by contig id.
pub fn profile_contigs(graph: &ContigGraph) -> Vec<ContigInfo> {
    (0..graph.len())
        .into_par_iter()
        .map(|id| profile_contig(graph.edges(id)))
        .collect()
}

pub fn max_trust_boundary(infos: &[ContigInfo]) -> usize {
    infos.iter().map(|info| info.trust_boundary).max().unwrap_or(0)
}
