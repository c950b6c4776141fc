// src/dag/resolver.rs

//! Generation-based topological sort.
//!
//! Kahn's algorithm, but instead of emitting one vertex at a time each pass
//! extracts *every* vertex whose prerequisites are already resolved. The
//! resulting tiers are the concurrency waves: all members of tier `k` may run
//! together once tiers `0..k` have completed.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::dag::graph::DependencyGraph;
use crate::errors::{Result, TestdagError};
use crate::types::JobName;

/// One concurrency wave. Ordered for reproducible output only; membership
/// order carries no execution-order meaning.
pub type Tier = BTreeSet<JobName>;

/// Compute the concurrency tiers of `graph`.
///
/// A vertex is ready when it has no unresolved prerequisites, or when it is
/// only ever referenced as a prerequisite (implicit leaf). Fails with
/// [`TestdagError::CyclicDependency`] as soon as a pass finds nothing to
/// extract while vertices remain; self-references are 1-cycles.
pub fn resolve_tiers(graph: &DependencyGraph) -> Result<Vec<Tier>> {
    let mut remaining: BTreeMap<JobName, BTreeSet<JobName>> = graph.as_map().clone();
    let mut tiers: Vec<Tier> = Vec::new();

    while !remaining.is_empty() {
        let mut ready: Tier = remaining
            .values()
            .flatten()
            .filter(|v| !remaining.contains_key(*v))
            .cloned()
            .collect();
        ready.extend(
            remaining
                .iter()
                .filter(|(_, prereqs)| prereqs.is_empty())
                .map(|(k, _)| k.clone()),
        );

        if ready.is_empty() {
            return Err(cycle_error(&remaining));
        }

        remaining = remaining
            .into_iter()
            .filter(|(_, prereqs)| !prereqs.is_empty())
            .map(|(k, prereqs)| {
                let left = prereqs.difference(&ready).cloned().collect();
                (k, left)
            })
            .collect();

        debug!(tier = tiers.len(), members = ?ready, "resolved tier");
        tiers.push(ready);
    }

    Ok(tiers)
}

/// Build the error for a stalled resolution, naming the jobs that sit on a
/// cycle (as opposed to jobs merely downstream of one).
fn cycle_error(remaining: &BTreeMap<JobName, BTreeSet<JobName>>) -> TestdagError {
    // Edge direction: prereq -> job.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for (job, prereqs) in remaining {
        graph.add_node(job.as_str());
        for prereq in prereqs {
            graph.add_edge(prereq.as_str(), job.as_str(), ());
        }
    }

    let mut on_cycle: Vec<String> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || scc.iter().any(|n| graph.contains_edge(*n, *n)))
        .flatten()
        .map(str::to_string)
        .collect();

    if on_cycle.is_empty() {
        on_cycle = remaining.keys().cloned().collect();
    }
    on_cycle.sort();

    warn!(
        jobs = ?on_cycle,
        blocked = remaining.len(),
        "cyclic dependency detected while resolving tiers"
    );
    TestdagError::CyclicDependency { jobs: on_cycle }
}
