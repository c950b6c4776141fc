// src/errors.rs

//! Crate-wide error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Duplicate job name: {0}")]
    DuplicateJob(String),

    #[error("Cyclic or invalid dependency detected among jobs: {}", jobs.join(", "))]
    CyclicDependency { jobs: Vec<String> },

    #[error("job '{job}' has unknown dependency '{dependency}'")]
    UnknownDependency { job: String, dependency: String },

    #[error("output file race condition between '{first}' and '{second}' on {files:?}")]
    OutputRaceCondition {
        first: String,
        second: String,
        files: Vec<String>,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TestdagError>;
