// src/types.rs

//! Small shared types used across the gate, the DAG helpers and the runtime.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Canonical job name type used throughout the crate.
pub type JobName = String;

/// Output file paths a job produces, relative to its working directory.
///
/// Ordered so that race reports and dry-run output are reproducible.
pub type OutputFiles = BTreeSet<String>;

/// Outcome category ("bucket") for a job.
///
/// - `Pass`: the job ran and succeeded.
/// - `Fail`: the job ran and failed, or was gated to failure.
/// - `Diff`: the job ran but its output differed from the gold file.
/// - `Pending`: initial bucket; nothing has decided this job yet.
/// - `Finished`: done, with the real verdict reported elsewhere (queued).
/// - `Deleted`: a skipped job that is still reported to the user.
/// - `Skip`: reported as skipped (e.g. a prerequisite did not pass).
/// - `Silent`: skipped without alerting the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Pass,
    Fail,
    Diff,
    Pending,
    Finished,
    Deleted,
    Skip,
    Silent,
}

impl Bucket {
    /// Upper-case label used in result lines.
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Pass => "PASS",
            Bucket::Fail => "FAIL",
            Bucket::Diff => "DIFF",
            Bucket::Pending => "PENDING",
            Bucket::Finished => "FINISHED",
            Bucket::Deleted => "DELETED",
            Bucket::Skip => "SKIP",
            Bucket::Silent => "SILENT",
        }
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Bucket::Pending
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Bucket::Pass),
            "fail" => Ok(Bucket::Fail),
            "diff" => Ok(Bucket::Diff),
            "pending" => Ok(Bucket::Pending),
            "finished" => Ok(Bucket::Finished),
            "deleted" => Ok(Bucket::Deleted),
            "skip" => Ok(Bucket::Skip),
            "silent" => Ok(Bucket::Silent),
            other => Err(format!("invalid bucket: {other}")),
        }
    }
}

/// Outcome a job runner reports after actually executing a job.
///
/// Only the buckets an execution can legitimately produce are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Pass,
    Fail,
    Diff,
}

impl RunOutcome {
    pub fn bucket(self) -> Bucket {
        match self {
            RunOutcome::Pass => Bucket::Pass,
            RunOutcome::Fail => Bucket::Fail,
            RunOutcome::Diff => Bucket::Diff,
        }
    }
}

impl Default for RunOutcome {
    fn default() -> Self {
        RunOutcome::Pass
    }
}
