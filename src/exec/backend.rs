// src/exec/backend.rs

//! Pluggable runner abstraction.
//!
//! - [`ManifestRunner`] is what the `testdag` binary uses: it reports the
//!   outcome configured for each job in the manifest, without spawning
//!   anything.
//! - Tests provide their own `JobRunner` that records dispatches and emits
//!   `JobCompleted` events directly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::RuntimeEvent;
use crate::errors::{Error, Result};
use crate::job::Job;

/// Trait abstracting how gated jobs are executed.
pub trait JobRunner: Send {
    /// Start the given jobs. Completion is reported asynchronously through
    /// the runtime event channel, one `JobCompleted` per job.
    fn spawn_ready_jobs(
        &mut self,
        jobs: Vec<Arc<Job>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Runner that "executes" a job by reporting its manifest `outcome`.
///
/// Completions are sent inline, so the event channel must have room for one
/// completion per job (the runtime sizes it that way).
pub struct ManifestRunner {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl ManifestRunner {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { runtime_tx }
    }
}

impl JobRunner for ManifestRunner {
    fn spawn_ready_jobs(
        &mut self,
        jobs: Vec<Arc<Job>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            for job in jobs {
                let started = Instant::now();
                let outcome = job.outcome();
                debug!(job = %job.name(), ?outcome, "simulated run");

                tx.send(RuntimeEvent::JobCompleted {
                    job: job.name().to_string(),
                    outcome,
                    message: "simulated".to_string(),
                    duration: started.elapsed(),
                })
                .await
                .map_err(Error::from)?;
            }
            Ok(())
        })
    }
}
