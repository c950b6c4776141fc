// src/exec/mod.rs

//! Job execution backends.
//!
//! Actually spawning test processes is outside this crate. The runtime hands
//! `Go` jobs to a [`JobRunner`]; runners report back with
//! `RuntimeEvent::JobCompleted`.

pub mod backend;

pub use backend::{JobRunner, ManifestRunner};
