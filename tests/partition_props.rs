use hmr::libs::graph::{Contig, ContigGraph, EdgeRecord};
use hmr::libs::partition::profile::profile_contigs;
use hmr::libs::partition::trust::{collect_trust_edges, select_best_contigs, trust_edge_capacity};
use hmr::libs::partition::{partition, PartitionConfig};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn graph_strategy() -> impl Strategy<Value = ContigGraph> {
    (2usize..14).prop_flat_map(|n| {
        (
            prop::collection::vec(1u64..1000, n),
            prop::collection::vec((0..n, 0..n, 0.0f64..100.0), 0..(n * 3)),
        )
            .prop_map(|(lengths, edges)| {
                let contigs = lengths
                    .iter()
                    .enumerate()
                    .map(|(i, &len)| Contig::new(&format!("ctg{}", i), len))
                    .collect();
                let records: Vec<EdgeRecord> = edges
                    .into_iter()
                    .map(|(a, b, w)| EdgeRecord::new(a, b, w))
                    .collect();
                ContigGraph::from_records(contigs, &records).unwrap()
            })
    })
}

proptest! {
    #[test]
    fn groups_are_disjoint_and_cover_all(graph in graph_strategy(), k in 2usize..5) {
        if let Ok(result) = partition(&graph, &PartitionConfig::new(k, 1)) {
            if result.window.is_some() {
                prop_assert_eq!(result.groups.len(), k);
            } else {
                prop_assert!(result.groups.is_empty());
                prop_assert_eq!(result.unassigned.len(), graph.len());
            }

            let mut seen = BTreeSet::new();
            for group in &result.groups {
                prop_assert!(!group.is_empty());
                for &id in group {
                    prop_assert!(seen.insert(id), "contig {} in two groups", id);
                }
            }
            for &id in &result.unassigned {
                prop_assert!(seen.insert(id), "contig {} both grouped and unassigned", id);
            }
            prop_assert_eq!(seen, (0..graph.len()).collect::<BTreeSet<_>>());
        }
    }

    #[test]
    fn partition_is_deterministic(graph in graph_strategy(), k in 2usize..4) {
        let first = partition(&graph, &PartitionConfig::new(k, 1)).ok();
        let second = partition(&graph, &PartitionConfig::new(k, 3)).ok();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn single_group_holds_everything(graph in graph_strategy()) {
        let result = partition(&graph, &PartitionConfig::new(1, 2)).unwrap();
        prop_assert_eq!(result.groups.len(), 1);
        prop_assert_eq!(result.assigned(), graph.len());
        prop_assert!(result.unassigned.is_empty());
    }

    #[test]
    fn best_contigs_grow_with_target(graph in graph_strategy(), target in 0usize..8) {
        let infos = profile_contigs(&graph);
        let edges = collect_trust_edges(&infos, trust_edge_capacity(graph.len()));
        let smaller = select_best_contigs(&edges, target);
        let larger = select_best_contigs(&edges, target + 1);
        prop_assert!(smaller.is_subset(&larger));

        if let Some((_, rest)) = edges.split_last() {
            let trimmed = select_best_contigs(rest, target);
            prop_assert!(trimmed.is_subset(&smaller));
        }
    }
}
