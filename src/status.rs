// src/status.rs

//! Per-job outcome state.
//!
//! A job starts out `Pending` with the message `"initialized"` and is moved
//! away from `Pending` by exactly one writer: either the gate (skip/fail
//! verdicts) or the execution subsystem (after a run). Nothing here validates
//! bucket-to-bucket transitions; callers own the "decided once" rule.

use crate::types::Bucket;

/// Message attached to a freshly created status.
pub const INITIAL_MESSAGE: &str = "initialized";

/// Bucket plus the human-readable reason it was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    bucket: Bucket,
    message: String,
}

impl JobStatus {
    pub fn new(message: impl Into<String>, bucket: Bucket) -> Self {
        Self {
            bucket,
            message: message.into(),
        }
    }

    /// Overwrite bucket and message.
    pub fn set(&mut self, message: impl Into<String>, bucket: Bucket) {
        self.message = message.into();
        self.bucket = bucket;
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn did_pass(&self) -> bool {
        self.bucket == Bucket::Pass
    }

    /// `Fail` or `Diff`.
    pub fn did_fail(&self) -> bool {
        matches!(self.bucket, Bucket::Fail | Bucket::Diff)
    }

    pub fn did_diff(&self) -> bool {
        self.bucket == Bucket::Diff
    }

    pub fn is_pending(&self) -> bool {
        self.bucket == Bucket::Pending
    }

    pub fn is_skipped(&self) -> bool {
        self.bucket == Bucket::Skip
    }

    pub fn is_silent(&self) -> bool {
        self.bucket == Bucket::Silent
    }

    pub fn is_deleted(&self) -> bool {
        self.bucket == Bucket::Deleted
    }

    /// True for `Finished` and for every other bucket except `Pending`.
    ///
    /// Skip propagation in the gate relies on this broad reading: a
    /// prerequisite counts as done the moment it leaves `Pending`.
    pub fn is_finished(&self) -> bool {
        self.bucket == Bucket::Finished || self.bucket != Bucket::Pending
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::new(INITIAL_MESSAGE, Bucket::Pending)
    }
}
