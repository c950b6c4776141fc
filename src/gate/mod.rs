// src/gate/mod.rs

//! Per-job runnability decision.
//!
//! [`evaluate_gate`] is called by the poll loop for a job that has not been
//! decided yet. It answers `Go`, `Wait` or `Blocked`; only `Blocked` writes
//! anything, and only to the gated job's own status.
//!
//! Order of checks:
//! 1. output file races among jobs that may run concurrently (and cycles),
//! 2. every prerequisite names a known sibling,
//! 3. every prerequisite passed (or the prerequisite bypass is on) -> `Go`,
//! 4. no prerequisite has finished without passing -> `Wait`,
//! 5. otherwise -> `Skip`.

pub mod options;
pub mod snapshot;
pub mod verdict;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dag::{DependencyGraph, resolve_tiers};
use crate::errors::TestdagError;
use crate::job::Job;
use crate::types::Bucket;

pub use options::GateOptions;
pub use snapshot::{GateSnapshot, SiblingView};
pub use verdict::{
    REASON_CYCLIC, REASON_NOT_EXECUTED, REASON_NOT_RUNNABLE, REASON_RACE, REASON_SKIPPED,
    REASON_UNKNOWN, Verdict,
};

/// Evaluate the gate for `job` against its co-scheduled `siblings`.
///
/// `siblings` may or may not contain `job` itself.
pub fn evaluate_gate(job: &Job, siblings: &[Arc<Job>], options: &GateOptions) -> Verdict {
    StatusGate::new(job, siblings, *options).check_and_set_status()
}

/// Gate evaluation bound to one job and one snapshot of its siblings.
#[derive(Debug)]
pub struct StatusGate<'a> {
    snapshot: GateSnapshot<'a>,
    options: GateOptions,
}

impl<'a> StatusGate<'a> {
    pub fn new(job: &'a Job, siblings: &'a [Arc<Job>], options: GateOptions) -> Self {
        Self {
            snapshot: GateSnapshot::new(job, siblings),
            options,
        }
    }

    /// Run the checks in order and return the verdict, writing the job's
    /// status when the verdict is `Blocked`.
    pub fn check_and_set_status(&self) -> Verdict {
        let job = self.snapshot.target();

        if let Err(err) = self.check_race_conditions() {
            let reason = match &err {
                TestdagError::CyclicDependency { .. } => REASON_CYCLIC,
                _ => REASON_RACE,
            };
            warn!(job = %job.name(), error = %err, "gate failed job");
            return self.block(reason, Bucket::Fail);
        }

        if let Some(missing) = self.snapshot.missing_prereq() {
            let err = TestdagError::UnknownDependency {
                job: job.name().to_string(),
                dependency: missing.to_string(),
            };
            warn!(job = %job.name(), error = %err, "gate failed job");
            return self.block(REASON_UNKNOWN, Bucket::Fail);
        }

        if self.is_runnable() {
            debug!(job = %job.name(), "all prerequisites satisfied");
            return Verdict::Go;
        }

        if self.is_appendable() {
            debug!(job = %job.name(), "prerequisites still pending");
            return Verdict::Wait;
        }

        self.block(REASON_SKIPPED, Bucket::Skip)
    }

    /// All prerequisites passed, or prerequisite gating is bypassed.
    pub fn is_runnable(&self) -> bool {
        if self.options.ignore_prereq_gating {
            return true;
        }
        let passing = self.snapshot.passing();
        self.snapshot
            .target()
            .prereqs()
            .iter()
            .all(|p| passing.contains(p.as_str()))
    }

    /// No prerequisite has finished without passing, so the job may still
    /// become runnable later.
    pub fn is_appendable(&self) -> bool {
        if self.options.ignore_prereq_gating {
            return true;
        }
        let skipped = self.snapshot.skipped_or_failed();
        !self
            .snapshot
            .target()
            .prereqs()
            .iter()
            .any(|p| skipped.contains(p.as_str()))
    }

    /// Every prerequisite names a known sibling.
    pub fn prereqs_exist(&self) -> bool {
        self.snapshot.missing_prereq().is_none()
    }

    /// Tier all co-scheduled jobs and look for two members of one tier that
    /// write the same output file.
    ///
    /// Jobs that are already skipped/failed, and names that match no job, are
    /// left out. If the gated job has unknown prerequisites the comparison is
    /// skipped here; the existence check reports it instead.
    pub fn check_race_conditions(&self) -> Result<(), TestdagError> {
        let graph = DependencyGraph::from_jobs(self.snapshot.all_jobs());
        let tiers = resolve_tiers(&graph)?;

        if !self.prereqs_exist() {
            return Ok(());
        }

        let skipped = self.snapshot.skipped_or_failed();

        for tier in &tiers {
            let mut owners: BTreeMap<&str, &str> = BTreeMap::new();

            for name in tier {
                if skipped.contains(name.as_str()) {
                    continue;
                }
                let Some(member) = self.snapshot.job(name) else {
                    continue;
                };

                let mut clash: Option<(&str, Vec<String>)> = None;
                for file in member.outputs() {
                    match owners.get(file.as_str()) {
                        Some(owner) => {
                            let (_, files) = clash.get_or_insert((*owner, Vec::new()));
                            files.push(file.clone());
                        }
                        None => {
                            owners.insert(file.as_str(), member.name());
                        }
                    }
                }

                if let Some((first, files)) = clash {
                    return Err(TestdagError::OutputRaceCondition {
                        first: first.to_string(),
                        second: member.name().to_string(),
                        files,
                    });
                }
            }
        }

        Ok(())
    }

    fn block(&self, reason: &str, bucket: Bucket) -> Verdict {
        let (status, _) = self.snapshot.target().decide(reason, bucket);
        Verdict::Blocked {
            bucket: status.bucket(),
            reason: status.message().to_string(),
        }
    }
}
