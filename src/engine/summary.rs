// src/engine/summary.rs

use std::time::Duration;

use crate::report::{Color, color_of, format_result};
use crate::types::{Bucket, JobName};

/// Final status of one job after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub name: JobName,
    pub bucket: Bucket,
    pub message: String,
    /// Set only for jobs that were actually run.
    pub duration: Option<Duration>,
}

impl JobResult {
    /// Result line for terminal output.
    pub fn line(&self) -> String {
        let result = if self.message.is_empty() {
            self.bucket.to_string()
        } else {
            format!("{} {}", self.bucket, self.message)
        };
        format_result(&self.name, &result, self.duration)
    }

    /// Display colour for this result's bucket.
    pub fn color(&self) -> Color {
        color_of(self.bucket)
    }
}

/// Outcome of a whole run, in job name order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    results: Vec<JobResult>,
}

impl RunSummary {
    pub fn new(results: Vec<JobResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[JobResult] {
        &self.results
    }

    pub fn get(&self, name: &str) -> Option<&JobResult> {
        self.results.iter().find(|r| r.name == name)
    }

    fn count(&self, pred: impl Fn(Bucket) -> bool) -> usize {
        self.results.iter().filter(|r| pred(r.bucket)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|b| b == Bucket::Pass)
    }

    /// `Fail` or `Diff`.
    pub fn failed(&self) -> usize {
        self.count(|b| matches!(b, Bucket::Fail | Bucket::Diff))
    }

    pub fn skipped(&self) -> usize {
        self.count(|b| b == Bucket::Skip)
    }

    /// Jobs still `Pending` when the run ended.
    pub fn undecided(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.bucket == Bucket::Pending)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// No failures and nothing left undecided.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.undecided().is_empty()
    }
}
