// src/engine/core.rs

//! Pure poll-loop state.
//!
//! No channels, no Tokio, no IO: the core is driven by `poll()` and
//! `complete()` and can be unit tested synchronously.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::dag::{DependencyGraph, ReverseReachability};
use crate::engine::summary::{JobResult, RunSummary};
use crate::errors::{Result, TestdagError};
use crate::gate::{GateOptions, REASON_NOT_EXECUTED, REASON_NOT_RUNNABLE, Verdict, evaluate_gate};
use crate::job::{Job, JobSet};
use crate::types::{Bucket, JobName, RunOutcome};

/// What a single poll decided.
#[derive(Debug, Clone, Default)]
pub struct PollStep {
    /// Jobs gated `Go` that fit in a free slot; now counted as running.
    pub dispatch: Vec<Arc<Job>>,
    /// Jobs decided by the gate during this poll, with their verdicts.
    pub blocked: Vec<(JobName, Verdict)>,
    /// Jobs that must be polled again.
    pub waiting: Vec<JobName>,
    /// Jobs gated `Go` but left for a later poll because every slot is busy.
    pub deferred: Vec<JobName>,
}

impl PollStep {
    /// Whether this poll changed anything.
    pub fn made_progress(&self) -> bool {
        !self.dispatch.is_empty() || !self.blocked.is_empty()
    }
}

#[derive(Debug)]
pub struct CoreRuntime {
    jobs: JobSet,
    /// Same jobs as `jobs`, as the slice the gate reads.
    siblings: Vec<Arc<Job>>,
    options: GateOptions,
    slots: usize,
    running: BTreeSet<JobName>,
    durations: BTreeMap<JobName, Duration>,
    dependents: ReverseReachability,
    polls: usize,
    polls_without_progress: usize,
    max_polls: usize,
    shutdown: bool,
}

impl CoreRuntime {
    pub fn new(jobs: JobSet, options: GateOptions, slots: usize, max_polls: usize) -> Self {
        let siblings = jobs.to_vec();
        // Prerequisite structure never changes during a run; statuses do.
        let graph = DependencyGraph::from_jobs(siblings.iter().map(|j| j.as_ref()));
        let dependents = ReverseReachability::from_graph(&graph);

        Self {
            jobs,
            siblings,
            options,
            slots: slots.max(1),
            running: BTreeSet::new(),
            durations: BTreeMap::new(),
            dependents,
            polls: 0,
            polls_without_progress: 0,
            max_polls: max_polls.max(1),
            shutdown: false,
        }
    }

    pub fn jobs(&self) -> &JobSet {
        &self.jobs
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Evaluate the gate for every job that is still pending and not running.
    ///
    /// Jobs are visited in name order; `Go` jobs are dispatched while slots
    /// are free.
    pub fn poll(&mut self) -> PollStep {
        self.polls += 1;
        let mut step = PollStep::default();

        if self.shutdown {
            self.polls_without_progress += 1;
            return step;
        }

        for job in &self.siblings {
            if self.running.contains(job.name()) || !job.status().is_pending() {
                continue;
            }

            if let Some(verdict) = bar_if_not_executable(job) {
                info!(job = %job.name(), %verdict, "job barred from running");
                self.log_affected_dependents(job.name());
                step.blocked.push((job.name().to_string(), verdict));
                continue;
            }

            match evaluate_gate(job, &self.siblings, &self.options) {
                Verdict::Go => {
                    if self.running.len() < self.slots {
                        info!(job = %job.name(), "dispatching job");
                        self.running.insert(job.name().to_string());
                        step.dispatch.push(Arc::clone(job));
                    } else {
                        debug!(job = %job.name(), "gate open but no free slot");
                        step.deferred.push(job.name().to_string());
                    }
                }
                Verdict::Wait => {
                    step.waiting.push(job.name().to_string());
                }
                verdict @ Verdict::Blocked { .. } => {
                    warn!(job = %job.name(), %verdict, "job blocked by gate");
                    self.log_affected_dependents(job.name());
                    step.blocked.push((job.name().to_string(), verdict));
                }
            }
        }

        if step.made_progress() {
            self.polls_without_progress = 0;
        } else {
            self.polls_without_progress += 1;
        }

        debug!(
            poll = self.polls,
            dispatched = step.dispatch.len(),
            blocked = step.blocked.len(),
            waiting = step.waiting.len(),
            "poll complete"
        );
        step
    }

    /// Record the outcome of a dispatched job.
    ///
    /// This is the execution side's single write to the job's status.
    pub fn complete(
        &mut self,
        name: &str,
        outcome: RunOutcome,
        message: impl Into<String>,
        duration: Duration,
    ) -> Result<()> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| TestdagError::JobNotFound(name.to_string()))?;

        if !self.running.remove(name) {
            warn!(job = %name, "completion for a job that was not running");
        }

        job.set_status(message, outcome.bucket());
        self.durations.insert(name.to_string(), duration);
        self.polls_without_progress = 0;

        if job.did_pass() {
            info!(job = %name, ?duration, "job passed");
        } else {
            warn!(job = %name, bucket = %job.bucket(), "job did not pass");
            self.log_affected_dependents(name);
        }
        Ok(())
    }

    /// Stop dispatching; jobs already running may still complete.
    pub fn request_shutdown(&mut self) {
        self.shutdown = true;
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown
    }

    /// Nothing running and every job has left `Pending`.
    pub fn is_finished(&self) -> bool {
        self.running.is_empty() && self.siblings.iter().all(|j| !j.status().is_pending())
    }

    /// Nothing running and `max_polls` consecutive polls changed nothing.
    pub fn is_stalled(&self) -> bool {
        self.running.is_empty() && self.polls_without_progress >= self.max_polls
    }

    /// Final status of every job, in name order.
    pub fn summary(&self) -> RunSummary {
        let results = self
            .siblings
            .iter()
            .map(|job| {
                let status = job.status();
                JobResult {
                    name: job.name().to_string(),
                    bucket: status.bucket(),
                    message: status.message().to_string(),
                    duration: self.durations.get(job.name()).copied(),
                }
            })
            .collect();
        RunSummary::new(results)
    }

    fn log_affected_dependents(&self, name: &str) {
        if self.options.ignore_prereq_gating {
            return;
        }
        let affected = self.dependents.reverse_reachable_set(name);
        if !affected.is_empty() {
            warn!(job = %name, dependents = ?affected, "dependents will not run");
        }
    }
}

/// Decide a job whose administrative flags forbid running it.
///
/// `runnable = false` is reported as `Skip`; `should_execute = false` is
/// dropped silently. Returns `None` for jobs that may run.
pub fn bar_if_not_executable(job: &Job) -> Option<Verdict> {
    let (bucket, reason) = if !job.is_runnable() {
        (Bucket::Skip, REASON_NOT_RUNNABLE)
    } else if !job.should_execute() {
        (Bucket::Silent, REASON_NOT_EXECUTED)
    } else {
        return None;
    };

    let (status, _) = job.decide(reason, bucket);
    Some(Verdict::Blocked {
        bucket: status.bucket(),
        reason: status.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(jobs: Vec<Job>) -> JobSet {
        JobSet::from_jobs(jobs).unwrap()
    }

    fn job(name: &str, prereqs: &[&str]) -> Job {
        Job::new(
            name,
            prereqs.iter().map(|s| s.to_string()).collect(),
            Vec::new(),
        )
    }

    fn names(jobs: &[Arc<Job>]) -> Vec<&str> {
        jobs.iter().map(|j| j.name()).collect()
    }

    #[test]
    fn chain_runs_one_tier_at_a_time() {
        let mut core = CoreRuntime::new(
            set(vec![job("a", &[]), job("b", &["a"]), job("c", &["b"])]),
            GateOptions::default(),
            4,
            10,
        );

        let step = core.poll();
        assert_eq!(names(&step.dispatch), vec!["a"]);
        assert_eq!(step.waiting, vec!["b", "c"]);

        core.complete("a", RunOutcome::Pass, "ok", Duration::ZERO).unwrap();
        let step = core.poll();
        assert_eq!(names(&step.dispatch), vec!["b"]);

        core.complete("b", RunOutcome::Pass, "ok", Duration::ZERO).unwrap();
        let step = core.poll();
        assert_eq!(names(&step.dispatch), vec!["c"]);

        core.complete("c", RunOutcome::Pass, "ok", Duration::ZERO).unwrap();
        assert!(core.is_finished());
        assert_eq!(core.summary().passed(), 3);
    }

    #[test]
    fn failure_skips_dependents_transitively() {
        let mut core = CoreRuntime::new(
            set(vec![job("a", &[]), job("b", &["a"]), job("c", &["b"])]),
            GateOptions::default(),
            1,
            10,
        );

        core.poll();
        core.complete("a", RunOutcome::Fail, "exit 1", Duration::ZERO).unwrap();

        let step = core.poll();
        assert!(step.dispatch.is_empty());
        // b is skipped in name order before c is visited, so c sees it.
        assert_eq!(step.blocked.len(), 2);
        assert_eq!(core.jobs().get("b").unwrap().bucket(), Bucket::Skip);
        assert_eq!(core.jobs().get("c").unwrap().bucket(), Bucket::Skip);
        assert!(core.is_finished());
    }

    #[test]
    fn barred_jobs_are_decided_without_dispatch() {
        let mut core = CoreRuntime::new(
            set(vec![
                job("x", &["y"]),
                job("y", &[]).with_runnable(false),
                job("z", &[]).with_should_execute(false),
            ]),
            GateOptions::default(),
            4,
            10,
        );

        let step = core.poll();
        assert!(step.dispatch.is_empty());
        assert_eq!(core.running_count(), 0);

        let y = core.jobs().get("y").unwrap().status();
        assert_eq!((y.bucket(), y.message()), (Bucket::Skip, REASON_NOT_RUNNABLE));
        let z = core.jobs().get("z").unwrap().status();
        assert_eq!((z.bucket(), z.message()), (Bucket::Silent, REASON_NOT_EXECUTED));
        assert_eq!(core.jobs().get("x").unwrap().bucket(), Bucket::Skip);
        assert_eq!(step.blocked.len(), 3);
        assert!(core.is_finished());
    }

    #[test]
    fn slots_bound_dispatch() {
        let mut core = CoreRuntime::new(
            set(vec![job("a", &[]), job("b", &[]), job("c", &[])]),
            GateOptions::default(),
            2,
            10,
        );

        let step = core.poll();
        assert_eq!(names(&step.dispatch), vec!["a", "b"]);
        assert_eq!(step.deferred, vec!["c"]);
        assert_eq!(core.running_count(), 2);

        // Running jobs are not re-gated.
        let step = core.poll();
        assert!(step.dispatch.is_empty());
        assert_eq!(step.deferred, vec!["c"]);

        core.complete("a", RunOutcome::Pass, "ok", Duration::ZERO).unwrap();
        let step = core.poll();
        assert_eq!(names(&step.dispatch), vec!["c"]);
    }

    #[test]
    fn completion_for_unknown_job_errors() {
        let mut core = CoreRuntime::new(set(vec![job("a", &[])]), GateOptions::default(), 1, 1);
        let err = core
            .complete("zzz", RunOutcome::Pass, "ok", Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, TestdagError::JobNotFound(name) if name == "zzz"));
    }

    #[test]
    fn stalls_after_max_idle_polls() {
        // "b" waits on "a", which can never be dispatched after shutdown.
        let mut core = CoreRuntime::new(
            set(vec![job("a", &[]), job("b", &["a"])]),
            GateOptions::default(),
            1,
            3,
        );
        core.request_shutdown();

        for _ in 0..3 {
            assert!(!core.is_stalled());
            core.poll();
        }
        assert!(core.is_stalled());
        assert!(!core.is_finished());
        assert_eq!(core.summary().undecided(), vec!["a", "b"]);
    }
}
