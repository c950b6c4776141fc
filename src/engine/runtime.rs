// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::JobRunner;

use super::RuntimeEvent;
use super::core::CoreRuntime;
use super::summary::RunSummary;

/// Async shell around [`CoreRuntime`].
///
/// Polls the core, hands `Go` jobs to the runner, then waits for
/// `JobCompleted` events and polls again. All gating semantics live in the
/// core; this only moves events and jobs around.
pub struct Runtime<R: JobRunner> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    runner: R,
}

impl<R: JobRunner> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<R: JobRunner> Runtime<R> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, runner: R) -> Self {
        Self {
            core,
            event_rx,
            runner,
        }
    }

    /// Drive every job to a decision (or give up) and return the summary.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!(jobs = self.core.jobs().len(), "testdag runtime started");

        loop {
            let step = self.core.poll();

            if !step.dispatch.is_empty() {
                let names: Vec<_> = step.dispatch.iter().map(|j| j.name().to_string()).collect();
                debug!(?names, "spawning ready jobs");
                self.runner.spawn_ready_jobs(step.dispatch).await?;
            }

            if self.core.is_finished() {
                info!(polls = self.core.polls(), "all jobs decided");
                break;
            }

            if self.core.running_count() == 0 {
                if self.core.is_shutting_down() {
                    info!("running jobs drained after shutdown");
                    break;
                }
                if self.core.is_stalled() {
                    warn!(
                        polls = self.core.polls(),
                        waiting = ?step.waiting,
                        "no progress possible; giving up on remaining jobs"
                    );
                    break;
                }
                // Statuses written this poll may unblock others; poll again.
                continue;
            }

            match self.event_rx.recv().await {
                Some(RuntimeEvent::JobCompleted {
                    job,
                    outcome,
                    message,
                    duration,
                }) => {
                    debug!(%job, ?outcome, "runtime received completion");
                    self.core.complete(&job, outcome, message, duration)?;
                }
                Some(RuntimeEvent::ShutdownRequested) => {
                    info!("shutdown requested; waiting for running jobs only");
                    self.core.request_shutdown();
                }
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            }
        }

        info!("runtime exiting");
        Ok(self.core.summary())
    }
}
