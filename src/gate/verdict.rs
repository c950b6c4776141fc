// src/gate/verdict.rs

use std::fmt;

use crate::types::Bucket;

pub const REASON_RACE: &str = "output file race condition";
pub const REASON_CYCLIC: &str = "cyclic or invalid dependency";
pub const REASON_UNKNOWN: &str = "unknown dependency";
pub const REASON_SKIPPED: &str = "skipped dependency";
pub const REASON_NOT_RUNNABLE: &str = "not runnable";
pub const REASON_NOT_EXECUTED: &str = "not executed";

/// Result of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing obstructs the job; it may attempt to run.
    Go,
    /// A prerequisite outcome is not known yet; poll again later.
    Wait,
    /// The job has been decided and holds this bucket and reason.
    ///
    /// Usually the `Skip` or `Fail` written by this evaluation. If another
    /// writer decided the job first, it is whatever terminal status that
    /// writer left.
    Blocked { bucket: Bucket, reason: String },
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Go => f.write_str("go"),
            Verdict::Wait => f.write_str("wait"),
            Verdict::Blocked { bucket, reason } => write!(f, "blocked ({bucket}: {reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_bucket_and_reason() {
        let blocked = Verdict::Blocked {
            bucket: Bucket::Skip,
            reason: REASON_SKIPPED.to_string(),
        };
        assert_eq!(Verdict::Wait.to_string(), "wait");
        assert_eq!(blocked.to_string(), "blocked (SKIP: skipped dependency)");
    }
}
