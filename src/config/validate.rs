// src/config/validate.rs

use crate::config::model::{Manifest, RawManifest};
use crate::errors::{Result, TestdagError};

impl TryFrom<RawManifest> for Manifest {
    type Error = TestdagError;

    fn try_from(raw: RawManifest) -> std::result::Result<Self, Self::Error> {
        validate_raw_manifest(&raw)?;
        Ok(Manifest::new_unchecked(raw.options, raw.job))
    }
}

fn validate_raw_manifest(raw: &RawManifest) -> Result<()> {
    ensure_has_jobs(raw)?;
    validate_options(raw)?;
    validate_jobs(raw)?;
    Ok(())
}

fn ensure_has_jobs(raw: &RawManifest) -> Result<()> {
    if raw.job.is_empty() {
        return Err(TestdagError::ConfigError(
            "manifest must contain at least one [job.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_options(raw: &RawManifest) -> Result<()> {
    if raw.options.jobs == 0 {
        return Err(TestdagError::ConfigError(
            "[options].jobs must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.options.max_polls == 0 {
        return Err(TestdagError::ConfigError(
            "[options].max_polls must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_jobs(raw: &RawManifest) -> Result<()> {
    for (name, job) in raw.job.iter() {
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(TestdagError::ConfigError(format!(
                "invalid job name '{name}': names must be non-empty and contain no whitespace"
            )));
        }
        if job.outputs.iter().any(|o| o.trim().is_empty()) {
            return Err(TestdagError::ConfigError(format!(
                "job '{name}' lists an empty output path"
            )));
        }
        if job.prereq.iter().any(|p| p.trim().is_empty()) {
            return Err(TestdagError::ConfigError(format!(
                "job '{name}' lists an empty prerequisite name"
            )));
        }
    }
    Ok(())
}
