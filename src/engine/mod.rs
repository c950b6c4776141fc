// src/engine/mod.rs

//! Poll loop driving the gate.
//!
//! The pure state machine lives in [`core`]: every tick it re-evaluates the
//! gate for each undecided job and hands back the jobs that may start. The
//! async shell in [`runtime`] dispatches those to a runner and feeds
//! completions back in.

use std::time::Duration;

use crate::types::{JobName, RunOutcome};

pub mod core;
pub mod runtime;
pub mod summary;

pub use core::{CoreRuntime, PollStep, bar_if_not_executable};
pub use runtime::Runtime;
pub use summary::{JobResult, RunSummary};

/// Events flowing into the runtime from runners and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A dispatched job finished running.
    JobCompleted {
        job: JobName,
        outcome: RunOutcome,
        message: String,
        duration: Duration,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}
