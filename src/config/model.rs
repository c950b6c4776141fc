// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{Bucket, RunOutcome};

/// Manifest as read from TOML, before validation.
///
/// ```toml
/// [options]
/// ignored_caveats = "prereq"
/// jobs = 2
///
/// [job.mesh]
/// outputs = ["mesh_out.e"]
///
/// [job.restart]
/// prereq = ["mesh"]
/// outputs = ["restart_out.e"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawManifest {
    #[serde(default)]
    pub options: OptionsSection,

    /// All jobs from `[job.<name>]`, keyed by job name.
    #[serde(default)]
    pub job: BTreeMap<String, JobConfig>,
}

/// Validated manifest. Only constructible through `TryFrom<RawManifest>`.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub options: OptionsSection,
    pub job: BTreeMap<String, JobConfig>,
}

impl Manifest {
    pub(crate) fn new_unchecked(options: OptionsSection, job: BTreeMap<String, JobConfig>) -> Self {
        Self { options, job }
    }
}

/// `[options]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsSection {
    /// Whitespace-separated caveats to ignore; `prereq` or `all` disables
    /// prerequisite gating.
    #[serde(default)]
    pub ignored_caveats: String,

    /// Number of jobs the runtime may run at once.
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Consecutive polls without progress before the runtime gives up.
    #[serde(default = "default_max_polls")]
    pub max_polls: usize,
}

fn default_jobs() -> usize {
    1
}

fn default_max_polls() -> usize {
    1000
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            ignored_caveats: String::new(),
            jobs: default_jobs(),
            max_polls: default_max_polls(),
        }
    }
}

/// `[job.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Jobs that must pass before this one may run.
    #[serde(default)]
    pub prereq: Vec<String>,

    /// Files this job writes, relative to its working directory.
    #[serde(default)]
    pub outputs: Vec<String>,

    /// Outcome reported when the job is "run" by the manifest runner.
    #[serde(default)]
    pub outcome: RunOutcome,

    #[serde(default = "default_true")]
    pub runnable: bool,

    #[serde(default = "default_true")]
    pub should_execute: bool,

    /// Initial bucket; anything but `pending` means the job is already decided.
    #[serde(default)]
    pub status: Bucket,
}

fn default_true() -> bool {
    true
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            prereq: Vec::new(),
            outputs: Vec::new(),
            outcome: RunOutcome::default(),
            runnable: true,
            should_execute: true,
            status: Bucket::default(),
        }
    }
}
