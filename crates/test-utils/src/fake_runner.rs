use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use testdag::engine::RuntimeEvent;
use testdag::errors::Result;
use testdag::exec::JobRunner;
use testdag::job::Job;
use testdag::types::RunOutcome;

/// A fake runner that:
/// - records which jobs were dispatched, in order
/// - immediately reports `JobCompleted` with a per-job outcome (default pass).
pub struct FakeRunner {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    outcomes: BTreeMap<String, RunOutcome>,
}

impl FakeRunner {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            runtime_tx,
            executed,
            outcomes: BTreeMap::new(),
        }
    }

    /// Report `outcome` for `job` instead of a pass.
    pub fn with_outcome(mut self, job: &str, outcome: RunOutcome) -> Self {
        self.outcomes.insert(job.to_string(), outcome);
        self
    }
}

impl JobRunner for FakeRunner {
    fn spawn_ready_jobs(
        &mut self,
        jobs: Vec<Arc<Job>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let outcomes = self.outcomes.clone();

        Box::pin(async move {
            for job in jobs {
                {
                    let mut guard = executed.lock().unwrap();
                    guard.push(job.name().to_string());
                }

                let outcome = outcomes.get(job.name()).copied().unwrap_or_default();
                tx.send(RuntimeEvent::JobCompleted {
                    job: job.name().to_string(),
                    outcome,
                    message: "fake".to_string(),
                    duration: Duration::from_millis(1),
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
