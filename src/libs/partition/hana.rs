//! Kernel detection: voting, candidate sets, intersection merging and greedy
//! reduction down to the requested number of core groups.

use crate::libs::graph::{ContigGraph, ContigId};
use crate::libs::partition::heap::top_k_sum;
use crate::libs::partition::profile::ContigInfo;
use crate::libs::partition::CoreGroup;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Undirected edge, smaller id first.
pub type EdgeKey = (ContigId, ContigId);

pub fn edge_key(a: ContigId, b: ContigId) -> EdgeKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Supporters of one voted edge.
pub type Voters = (EdgeKey, BTreeSet<ContigId>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelCandidate {
    pub ids: BTreeSet<ContigId>,
    /// How many later voter sets this candidate subsumed.
    pub popularity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    pub set_a: usize,
    pub set_b: usize,
    pub ids: BTreeSet<ContigId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    pub ids: BTreeSet<ContigId>,
    /// Indices of the kernel candidates that contributed.
    pub sources: BTreeSet<usize>,
    pub relations: usize,
}

/// Every best contig votes for the edges inside its top-`window` neighbourhood.
///
/// A host votes for its own edge to each windowed neighbour and for every pair of
/// windowed neighbours. Only neighbours inside `best` take part.
pub fn vote_edges(
    window: usize,
    infos: &[ContigInfo],
    best: &BTreeSet<ContigId>,
) -> BTreeMap<EdgeKey, BTreeSet<ContigId>> {
    let mut votes: BTreeMap<EdgeKey, BTreeSet<ContigId>> = BTreeMap::new();
    for &host in best {
        let edges = &infos[host].edges;
        let members: Vec<ContigId> = edges[..window.min(edges.len())]
            .iter()
            .map(|e| e.id)
            .filter(|id| best.contains(id))
            .collect();

        for &id in &members {
            votes.entry(edge_key(host, id)).or_default().insert(host);
        }
        for (&a, &b) in members.iter().tuple_combinations() {
            votes.entry(edge_key(a, b)).or_default().insert(host);
        }
    }
    votes
}

/// Largest supporter sets first; equal sizes keep ascending edge order.
pub fn rank_voters(votes: BTreeMap<EdgeKey, BTreeSet<ContigId>>) -> Vec<Voters> {
    let mut voters: Vec<Voters> = votes.into_iter().collect();
    voters.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    voters
}

/// Greedy candidate extraction.
///
/// ```
/// use hmr::libs::partition::hana::extract_candidates;
/// use std::collections::BTreeSet;
///
/// let voters = vec![
///     ((0, 1), BTreeSet::from([1, 2, 3])),
///     ((0, 2), BTreeSet::from([1, 2])),
///     ((4, 5), BTreeSet::from([4, 5])),
/// ];
/// let candidates = extract_candidates(&voters);
/// assert_eq!(candidates.len(), 2);
/// assert_eq!(candidates[0].popularity, 1);
/// ```
pub fn extract_candidates(voters: &[Voters]) -> Vec<KernelCandidate> {
    let mut candidates: Vec<KernelCandidate> = Vec::new();
    for (_, supporters) in voters {
        let mut subsumed = false;
        for candidate in candidates.iter_mut() {
            if supporters.is_subset(&candidate.ids) {
                candidate.popularity += 1;
                subsumed = true;
            }
        }
        if !subsumed {
            candidates.push(KernelCandidate {
                ids: supporters.clone(),
                popularity: 0,
            });
        }
    }
    candidates.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    candidates
}

/// Pairwise intersections holding more than one contig, largest first.
pub fn candidate_intersections(candidates: &[KernelCandidate]) -> Vec<Intersection> {
    let mut intersections: Vec<Intersection> = (0..candidates.len())
        .tuple_combinations()
        .filter_map(|(set_a, set_b)| {
            let ids: BTreeSet<ContigId> = candidates[set_a]
                .ids
                .intersection(&candidates[set_b].ids)
                .copied()
                .collect();
            (ids.len() > 1).then_some(Intersection { set_a, set_b, ids })
        })
        .collect();
    intersections.sort_by(|a, b| b.ids.len().cmp(&a.ids.len()));
    intersections
}

/// Fold each intersection into the first merge group that already covers it.
pub fn fold_intersections(intersections: &[Intersection]) -> Vec<MergeGroup> {
    let mut groups: Vec<MergeGroup> = Vec::new();
    for inter in intersections {
        match groups.iter_mut().find(|g| inter.ids.is_subset(&g.ids)) {
            Some(group) => {
                group.sources.insert(inter.set_a);
                group.sources.insert(inter.set_b);
                group.relations += 1;
            }
            None => groups.push(MergeGroup {
                ids: inter.ids.clone(),
                sources: BTreeSet::from([inter.set_a, inter.set_b]),
                relations: 1,
            }),
        }
    }
    groups.sort_by(|a, b| b.relations.cmp(&a.relations));
    groups
}

/// Merge groups sharing a source candidate until none do.
pub fn close_merge_groups(mut groups: Vec<MergeGroup>) -> Vec<MergeGroup> {
    'restart: loop {
        for (i, j) in (0..groups.len()).tuple_combinations() {
            if !groups[i].sources.is_disjoint(&groups[j].sources) {
                let merged = groups.remove(j);
                groups[i].ids.extend(merged.ids);
                groups[i].sources.extend(merged.sources);
                groups[i].relations += merged.relations;
                continue 'restart;
            }
        }
        break;
    }
    groups
}

/// A contig claimed by several sets stays with the first one; emptied sets are dropped.
///
/// ```
/// use hmr::libs::partition::hana::make_disjoint;
/// use std::collections::BTreeSet;
///
/// let sets = make_disjoint(vec![BTreeSet::from([1, 2]), BTreeSet::from([2, 3]), BTreeSet::from([3])]);
/// assert_eq!(sets, vec![BTreeSet::from([1, 2]), BTreeSet::from([3])]);
/// ```
pub fn make_disjoint<I>(sets: I) -> Vec<BTreeSet<ContigId>>
where
    I: IntoIterator<Item = BTreeSet<ContigId>>,
{
    let mut claimed = BTreeSet::new();
    let mut result = Vec::new();
    for set in sets {
        let own: BTreeSet<ContigId> = set.difference(&claimed).copied().collect();
        if own.is_empty() {
            continue;
        }
        claimed.extend(own.iter().copied());
        result.push(own);
    }
    result
}

/// Sum of the `edge_limit` heaviest edges between two groups.
pub fn group_relation(lhs: &CoreGroup, rhs: &CoreGroup, infos: &[ContigInfo], edge_limit: usize) -> f64 {
    let cross = rhs
        .ids
        .iter()
        .flat_map(|&r| lhs.ids.iter().filter_map(move |&l| infos[r].weight(l)));
    top_k_sum(cross, edge_limit)
}

/// Merge the most related pair until only `target` groups remain.
///
/// The relation of a pair is normalised by the size of its smaller group; the
/// size of the smallest group overall caps the number of edges counted.
pub fn reduce_groups(groups: &mut Vec<CoreGroup>, target: usize, infos: &[ContigInfo]) {
    while groups.len() > target.max(1) {
        let edge_limit = groups.iter().map(CoreGroup::size).min().unwrap_or(0);

        let mut pick = (0, 1);
        let mut max_relation = f64::NEG_INFINITY;
        for (i, j) in (0..groups.len()).tuple_combinations() {
            let smaller = groups[i].size().min(groups[j].size()).max(1);
            let relation = group_relation(&groups[i], &groups[j], infos, edge_limit) / smaller as f64;
            if relation > max_relation {
                max_relation = relation;
                pick = (i, j);
            }
        }

        let (i, j) = pick;
        let merged = groups.remove(j);
        groups[i].absorb(merged);
    }
}

/// Run the whole stage for one window size.
///
/// Returns `None` when the window yields no usable kernel.
pub fn hana(
    window: usize,
    graph: &ContigGraph,
    infos: &[ContigInfo],
    best: &BTreeSet<ContigId>,
    target: usize,
) -> Option<Vec<CoreGroup>> {
    debug!(window, "HANA stage start");
    let voters = rank_voters(vote_edges(window, infos, best));
    debug!(window, sets = voters.len(), "contig voting sets collected");

    let candidates = extract_candidates(&voters);
    debug!(window, candidates = candidates.len(), "kernel candidate sets generated");
    if candidates.is_empty() {
        return None;
    }

    let intersections = candidate_intersections(&candidates);
    let kernels = if intersections.is_empty() {
        // Candidates are already separated; they can serve as kernels directly
        // if there are enough of them.
        let kernels = make_disjoint(candidates.into_iter().map(|c| c.ids));
        if kernels.len() < target {
            debug!(window, kernels = kernels.len(), "no intersection set found");
            return None;
        }
        kernels
    } else {
        debug!(window, intersections = intersections.len(), "intersection sets found");
        let merged = close_merge_groups(fold_intersections(&intersections));
        make_disjoint(merged.into_iter().map(|g| g.ids))
    };
    debug!(window, kernels = kernels.len(), "core groups built");

    let mut groups: Vec<CoreGroup> = kernels
        .into_iter()
        .map(|ids| CoreGroup::new(ids, graph))
        .collect();
    if groups.len() < target {
        debug!(window, groups = groups.len(), "too few core groups");
        return None;
    }
    reduce_groups(&mut groups, target, infos);
    debug!(window, groups = groups.len(), "HANA stage complete");

    Some(groups)
}
