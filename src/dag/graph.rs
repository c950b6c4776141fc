// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use crate::job::Job;
use crate::types::JobName;

/// Prerequisite graph: job name -> names of its direct prerequisites.
///
/// Built fresh for every gate evaluation, so nothing here assumes the graph
/// is acyclic or that every referenced name is a key. Names that are only
/// ever referenced as prerequisites are "implicit leaves".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    prereqs: BTreeMap<JobName, BTreeSet<JobName>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph over a job collection, using each job's prerequisite list.
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        let mut graph = Self::new();
        for job in jobs {
            graph.insert_dependency(job.name(), job.prereqs().iter().cloned());
        }
        graph
    }

    /// Record the direct prerequisites of `key`, replacing any previous entry.
    pub fn insert_dependency(
        &mut self,
        key: impl Into<JobName>,
        prereqs: impl IntoIterator<Item = JobName>,
    ) {
        self.prereqs.insert(key.into(), prereqs.into_iter().collect());
    }

    /// Explicit keys (jobs that were inserted).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.prereqs.keys().map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.prereqs.contains_key(key)
    }

    /// Direct prerequisites of `key`; `None` for implicit leaves and unknown names.
    pub fn prerequisites_of(&self, key: &str) -> Option<&BTreeSet<JobName>> {
        self.prereqs.get(key)
    }

    /// Explicit keys plus every name referenced as a prerequisite.
    pub fn vertices(&self) -> BTreeSet<&str> {
        self.prereqs
            .iter()
            .flat_map(|(k, vs)| std::iter::once(k.as_str()).chain(vs.iter().map(|v| v.as_str())))
            .collect()
    }

    /// Referenced prerequisite names that are not keys.
    pub fn implicit_leaves(&self) -> BTreeSet<&str> {
        self.prereqs
            .values()
            .flatten()
            .map(|v| v.as_str())
            .filter(|v| !self.prereqs.contains_key(*v))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.prereqs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prereqs.len()
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<JobName, BTreeSet<JobName>> {
        &self.prereqs
    }
}

impl<K, V, I> FromIterator<(K, I)> for DependencyGraph
where
    K: Into<JobName>,
    V: Into<JobName>,
    I: IntoIterator<Item = V>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut graph = Self::new();
        for (key, prereqs) in iter {
            graph.insert_dependency(key, prereqs.into_iter().map(Into::into));
        }
        graph
    }
}
