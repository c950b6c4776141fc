// src/job.rs

//! Job records and the registry the gate reads from.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::config::model::{JobConfig, Manifest};
use crate::errors::{Result, TestdagError};
use crate::status::JobStatus;
use crate::types::{Bucket, JobName, OutputFiles, RunOutcome};

/// A schedulable job.
///
/// Name, prerequisites, outputs and the administrative flags are fixed at
/// creation. The status lives behind its own lock so each job has exactly
/// one write path and readers never contend on a global lock.
#[derive(Debug)]
pub struct Job {
    name: JobName,
    prereqs: Vec<JobName>,
    outputs: OutputFiles,
    /// Administratively allowed to run under the current configuration.
    runnable: bool,
    /// Whether the job should be executed at all.
    should_execute: bool,
    /// Outcome the simulated runner reports for this job.
    outcome: RunOutcome,
    status: RwLock<JobStatus>,
}

impl Job {
    pub fn new(
        name: impl Into<JobName>,
        prereqs: Vec<JobName>,
        outputs: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            name: name.into(),
            prereqs,
            outputs: outputs.into_iter().collect(),
            runnable: true,
            should_execute: true,
            outcome: RunOutcome::default(),
            status: RwLock::new(JobStatus::default()),
        }
    }

    pub fn from_config(name: JobName, cfg: &JobConfig) -> Self {
        let mut job = Self::new(name, cfg.prereq.clone(), cfg.outputs.iter().cloned())
            .with_runnable(cfg.runnable)
            .with_should_execute(cfg.should_execute)
            .with_outcome(cfg.outcome);

        if cfg.status != Bucket::Pending {
            job.status = RwLock::new(JobStatus::new("from manifest", cfg.status));
        }
        job
    }

    pub fn with_runnable(mut self, runnable: bool) -> Self {
        self.runnable = runnable;
        self
    }

    pub fn with_should_execute(mut self, should_execute: bool) -> Self {
        self.should_execute = should_execute;
        self
    }

    pub fn with_outcome(mut self, outcome: RunOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prereqs(&self) -> &[JobName] {
        &self.prereqs
    }

    pub fn outputs(&self) -> &OutputFiles {
        &self.outputs
    }

    pub fn is_runnable(&self) -> bool {
        self.runnable
    }

    pub fn should_execute(&self) -> bool {
        self.should_execute
    }

    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> JobStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn bucket(&self) -> Bucket {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .bucket()
    }

    pub fn did_pass(&self) -> bool {
        self.status().did_pass()
    }

    pub fn did_fail(&self) -> bool {
        self.status().did_fail()
    }

    /// Unconditionally set the status.
    ///
    /// Callers are responsible for deciding each job once.
    pub fn set_status(&self, message: impl Into<String>, bucket: Bucket) {
        let message = message.into();
        debug!(job = %self.name, %bucket, %message, "setting job status");
        self.status
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(message, bucket);
    }

    /// Move the job out of `Pending`, but only if it is still pending.
    ///
    /// Returns the status the job holds afterwards and whether this call
    /// performed the write. A job that another writer already decided keeps
    /// its existing status.
    pub fn decide(&self, message: impl Into<String>, bucket: Bucket) -> (JobStatus, bool) {
        let mut guard = self.status.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_pending() {
            guard.set(message, bucket);
            (guard.clone(), true)
        } else {
            warn!(
                job = %self.name,
                current = %guard.bucket(),
                attempted = %bucket,
                "job already decided; keeping existing status"
            );
            (guard.clone(), false)
        }
    }
}

/// Registry of co-scheduled jobs keyed by unique name.
///
/// Jobs are held behind `Arc` so the runtime can hand a job to a runner
/// while gates keep reading it.
#[derive(Debug, Clone, Default)]
pub struct JobSet {
    jobs: BTreeMap<JobName, Arc<Job>>,
}

impl JobSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting duplicate names.
    pub fn from_jobs(jobs: impl IntoIterator<Item = Job>) -> Result<Self> {
        let mut set = Self::new();
        for job in jobs {
            set.insert(job)?;
        }
        Ok(set)
    }

    pub fn from_manifest(manifest: &Manifest) -> Self {
        let jobs = manifest
            .job
            .iter()
            .map(|(name, cfg)| (name.clone(), Arc::new(Job::from_config(name.clone(), cfg))))
            .collect();
        Self { jobs }
    }

    pub fn insert(&mut self, job: Job) -> Result<Arc<Job>> {
        if self.jobs.contains_key(job.name()) {
            return Err(TestdagError::DuplicateJob(job.name().to_string()));
        }
        let job = Arc::new(job);
        self.jobs.insert(job.name().to_string(), Arc::clone(&job));
        Ok(job)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Job>> {
        self.jobs.get(name)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Job>> {
        self.jobs.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.jobs.keys().map(|s| s.as_str())
    }

    /// All jobs as a slice-friendly vector, for handing to the gate.
    pub fn to_vec(&self) -> Vec<Arc<Job>> {
        self.jobs.values().cloned().collect()
    }
}
