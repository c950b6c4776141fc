use std::collections::BTreeMap;

use testdag::config::{JobConfig, Manifest, OptionsSection, RawManifest};
use testdag::job::JobSet;
use testdag::types::{Bucket, RunOutcome};

/// Builder for `Manifest` to simplify test setup.
pub struct ManifestBuilder {
    manifest: RawManifest,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            manifest: RawManifest {
                options: OptionsSection::default(),
                job: BTreeMap::new(),
            },
        }
    }

    pub fn with_job(mut self, name: &str, job: JobConfig) -> Self {
        self.manifest.job.insert(name.to_string(), job);
        self
    }

    pub fn ignored_caveats(mut self, caveats: &str) -> Self {
        self.manifest.options.ignored_caveats = caveats.to_string();
        self
    }

    pub fn jobs(mut self, slots: usize) -> Self {
        self.manifest.options.jobs = slots;
        self
    }

    pub fn max_polls(mut self, polls: usize) -> Self {
        self.manifest.options.max_polls = polls;
        self
    }

    pub fn raw(self) -> RawManifest {
        self.manifest
    }

    pub fn build(self) -> Manifest {
        Manifest::try_from(self.manifest).expect("Failed to build valid manifest from builder")
    }

    /// Build straight into the runtime's job registry.
    pub fn build_jobs(self) -> JobSet {
        JobSet::from_manifest(&self.build())
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`.
#[derive(Default)]
pub struct JobBuilder {
    job: JobConfig,
}

impl JobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prereq(mut self, dep: &str) -> Self {
        self.job.prereq.push(dep.to_string());
        self
    }

    pub fn output(mut self, file: &str) -> Self {
        self.job.outputs.push(file.to_string());
        self
    }

    pub fn outcome(mut self, outcome: RunOutcome) -> Self {
        self.job.outcome = outcome;
        self
    }

    pub fn runnable(mut self, val: bool) -> Self {
        self.job.runnable = val;
        self
    }

    pub fn should_execute(mut self, val: bool) -> Self {
        self.job.should_execute = val;
        self
    }

    pub fn status(mut self, bucket: Bucket) -> Self {
        self.job.status = bucket;
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}
