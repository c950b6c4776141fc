// src/dag/reachability.rs

//! Transitive dependents ("reverse reachability").
//!
//! Edges are inserted as `(key, values)`. Each value `v` gets an edge
//! `v -> key`, so with `key` = a job and `values` = its prerequisites, the
//! reverse-reachable set of a vertex is every job that (transitively) depends
//! on it. Cycles are tolerated.

use std::collections::{BTreeMap, BTreeSet};

use crate::dag::graph::DependencyGraph;
use crate::types::JobName;

#[derive(Debug, Clone, Default)]
pub struct ReverseReachability {
    adjacency: BTreeMap<JobName, BTreeSet<JobName>>,
}

impl ReverseReachability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dependents view of a prerequisite graph.
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut rr = Self::new();
        for (job, prereqs) in graph.as_map() {
            rr.insert_dependency(job.clone(), prereqs.iter().cloned());
        }
        rr
    }

    /// Record that `key` is reachable from each of `values`.
    ///
    /// `key` itself is always present afterwards, with no outgoing edges if it
    /// has never appeared as a value.
    pub fn insert_dependency(
        &mut self,
        key: impl Into<JobName>,
        values: impl IntoIterator<Item = JobName>,
    ) {
        let key = key.into();
        for value in values {
            self.adjacency
                .entry(value)
                .or_default()
                .insert(key.clone());
        }
        self.adjacency.entry(key).or_default();
    }

    /// Every vertex reachable by following edges forward from `key`.
    ///
    /// `key` is only included when it sits on a cycle. Unknown keys yield an
    /// empty set.
    pub fn reverse_reachable_set(&self, key: &str) -> BTreeSet<JobName> {
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut reached: BTreeSet<JobName> = BTreeSet::new();
        let mut stack: Vec<&str> = vec![key];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(adjacent) = self.adjacency.get(current) else {
                continue;
            };
            for next in adjacent {
                reached.insert(next.clone());
                if !visited.contains(next.as_str()) {
                    stack.push(next.as_str());
                }
            }
        }

        reached
    }

    /// Reverse-reachable sets for every known vertex.
    pub fn reverse_reachability_sets(&self) -> BTreeMap<JobName, BTreeSet<JobName>> {
        self.adjacency
            .keys()
            .map(|k| (k.clone(), self.reverse_reachable_set(k)))
            .collect()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<JobName> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chain_is_followed_transitively() {
        let mut rr = ReverseReachability::new();
        rr.insert_dependency("A", ["B".to_string()]);
        rr.insert_dependency("B", ["C".to_string()]);

        assert_eq!(rr.reverse_reachable_set("C"), set(&["A", "B"]));
        assert_eq!(rr.reverse_reachable_set("B"), set(&["A"]));
        assert!(rr.reverse_reachable_set("A").is_empty());
    }

    #[test]
    fn all_sets_cover_every_vertex() {
        let mut rr = ReverseReachability::new();
        rr.insert_dependency("b", ["a".to_string()]);
        rr.insert_dependency("c", ["a".to_string()]);
        rr.insert_dependency("d", ["b".to_string(), "c".to_string()]);

        let sets = rr.reverse_reachability_sets();
        assert_eq!(sets.len(), 4);
        assert_eq!(sets["a"], set(&["b", "c", "d"]));
        assert_eq!(sets["b"], set(&["d"]));
        assert!(sets["d"].is_empty());
    }

    #[test]
    fn cycles_terminate_and_include_self() {
        let mut rr = ReverseReachability::new();
        rr.insert_dependency("x", ["y".to_string()]);
        rr.insert_dependency("y", ["x".to_string()]);

        assert_eq!(rr.reverse_reachable_set("x"), set(&["x", "y"]));
    }

    #[test]
    fn from_graph_matches_manual_inserts() {
        let graph: DependencyGraph = [("b", vec!["a"]), ("c", vec!["b"])].into_iter().collect();
        let rr = ReverseReachability::from_graph(&graph);

        assert_eq!(rr.reverse_reachable_set("a"), set(&["b", "c"]));
        assert_eq!(rr.vertices().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_vertex_is_empty() {
        let rr = ReverseReachability::new();
        assert!(rr.reverse_reachable_set("nope").is_empty());
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut rr = ReverseReachability::new();
        for i in 1..10_000 {
            rr.insert_dependency(format!("n{i}"), [format!("n{}", i - 1)]);
        }
        assert_eq!(rr.reverse_reachable_set("n0").len(), 9_999);
    }
}
