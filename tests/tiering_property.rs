// tests/tiering_property.rs

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use testdag::dag::{DependencyGraph, ReverseReachability, resolve_tiers};

// Acyclic by construction: vertex i may only depend on vertices 0..i.
fn acyclic_graph_strategy(max_vertices: usize) -> impl Strategy<Value = DependencyGraph> {
    (1..=max_vertices).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..n), n).prop_map(
            move |raw| {
                let mut graph = DependencyGraph::new();
                for (i, picks) in raw.into_iter().enumerate() {
                    let deps: BTreeSet<String> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        picks.into_iter().map(|p| format!("v{}", p % i)).collect()
                    };
                    graph.insert_dependency(format!("v{i}"), deps);
                }
                graph
            },
        )
    })
}

proptest! {
    #[test]
    fn tiers_cover_every_vertex_once_in_dependency_order(graph in acyclic_graph_strategy(12)) {
        let tiers = resolve_tiers(&graph).unwrap();

        let mut tier_of: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, tier) in tiers.iter().enumerate() {
            prop_assert!(!tier.is_empty());
            for name in tier {
                prop_assert!(tier_of.insert(name.as_str(), i).is_none(), "{} tiered twice", name);
            }
        }

        prop_assert_eq!(tier_of.len(), graph.vertices().len());

        for key in graph.keys() {
            for prereq in graph.prerequisites_of(key).into_iter().flatten() {
                prop_assert!(tier_of[prereq.as_str()] < tier_of[key]);
            }
        }
    }

    #[test]
    fn every_dependent_is_reverse_reachable(graph in acyclic_graph_strategy(10)) {
        let rr = ReverseReachability::from_graph(&graph);

        for key in graph.keys() {
            // Nothing on an acyclic graph reaches itself.
            prop_assert!(!rr.reverse_reachable_set(key).contains(key));
            for prereq in graph.prerequisites_of(key).into_iter().flatten() {
                prop_assert!(rr.reverse_reachable_set(prereq).contains(key));
            }
        }
    }
}
