// src/gate/snapshot.rs

//! Point-in-time view of the sibling jobs for one gate evaluation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::warn;

use crate::job::Job;
use crate::status::JobStatus;

/// A sibling job together with the status it had when the snapshot was taken.
#[derive(Debug)]
pub struct SiblingView<'a> {
    pub job: &'a Job,
    pub status: JobStatus,
}

impl SiblingView<'_> {
    /// Finished without passing, or administratively barred from running.
    ///
    /// Such a sibling will never satisfy a dependent.
    pub fn is_skipped_or_failed(&self) -> bool {
        (self.status.is_finished() && !self.status.did_pass())
            || !self.job.is_runnable()
            || !self.job.should_execute()
    }
}

/// Statuses of every sibling except the gated job, read once.
///
/// All decisions in a single evaluation go through this snapshot so they
/// agree with each other even while other jobs complete concurrently.
#[derive(Debug)]
pub struct GateSnapshot<'a> {
    target: &'a Job,
    others: BTreeMap<&'a str, SiblingView<'a>>,
}

impl<'a> GateSnapshot<'a> {
    pub fn new(target: &'a Job, siblings: &'a [Arc<Job>]) -> Self {
        let mut others = BTreeMap::new();

        for sibling in siblings {
            let name = sibling.name();
            if name == target.name() {
                continue;
            }
            if others.contains_key(name) {
                warn!(job = %name, "duplicate sibling name; keeping the first");
                continue;
            }
            others.insert(
                name,
                SiblingView {
                    job: sibling.as_ref(),
                    status: sibling.status(),
                },
            );
        }

        Self { target, others }
    }

    pub fn target(&self) -> &'a Job {
        self.target
    }

    pub fn sibling(&self, name: &str) -> Option<&SiblingView<'a>> {
        self.others.get(name)
    }

    /// The gated job plus every sibling.
    pub fn all_jobs(&self) -> impl Iterator<Item = &'a Job> + '_ {
        std::iter::once(self.target).chain(self.others.values().map(|v| v.job))
    }

    /// Look up any job (including the gated one) by name.
    pub fn job(&self, name: &str) -> Option<&'a Job> {
        if name == self.target.name() {
            Some(self.target)
        } else {
            self.others.get(name).map(|v| v.job)
        }
    }

    /// Names of siblings that passed.
    pub fn passing(&self) -> BTreeSet<&'a str> {
        self.others
            .iter()
            .filter(|(_, v)| v.status.did_pass())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Names of siblings that finished without passing or cannot run.
    pub fn skipped_or_failed(&self) -> BTreeSet<&'a str> {
        self.others
            .iter()
            .filter(|(_, v)| v.is_skipped_or_failed())
            .map(|(name, _)| *name)
            .collect()
    }

    /// First prerequisite of the gated job that is not a known sibling.
    pub fn missing_prereq(&self) -> Option<&'a str> {
        self.target
            .prereqs()
            .iter()
            .map(|p| p.as_str())
            .find(|p| !self.others.contains_key(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bucket;

    fn job(name: &str, prereqs: &[&str]) -> Arc<Job> {
        Arc::new(Job::new(
            name,
            prereqs.iter().map(|s| s.to_string()).collect(),
            Vec::new(),
        ))
    }

    #[test]
    fn excludes_target_and_freezes_status() {
        let a = job("a", &[]);
        let b = job("b", &["a"]);
        let all = vec![Arc::clone(&a), Arc::clone(&b)];

        let snap = GateSnapshot::new(&b, &all);
        a.set_status("ran", Bucket::Pass);

        assert!(snap.sibling("b").is_none());
        assert!(snap.sibling("a").is_some_and(|v| v.status.is_pending()));
        assert!(snap.passing().is_empty());
        assert_eq!(snap.all_jobs().count(), 2);
    }

    #[test]
    fn skipped_includes_administrative_flags() {
        let a = Arc::new(Job::new("a", vec![], Vec::new()).with_runnable(false));
        let b = Arc::new(Job::new("b", vec![], Vec::new()).with_should_execute(false));
        let c = job("c", &[]);
        c.set_status("boom", Bucket::Diff);
        let d = job("d", &[]);
        d.set_status("ok", Bucket::Pass);
        let t = job("t", &["a", "b", "c", "d"]);
        let all = vec![a, b, c, d, Arc::clone(&t)];

        let snap = GateSnapshot::new(&t, &all);
        assert_eq!(
            snap.skipped_or_failed().into_iter().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(snap.passing().into_iter().collect::<Vec<_>>(), vec!["d"]);
        assert_eq!(snap.missing_prereq(), None);
    }

    #[test]
    fn self_reference_is_a_missing_prereq() {
        let t = job("t", &["t"]);
        let all = vec![Arc::clone(&t)];
        let snap = GateSnapshot::new(&t, &all);
        assert_eq!(snap.missing_prereq(), Some("t"));
    }
}
