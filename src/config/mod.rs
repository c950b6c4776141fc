// src/config/mod.rs

//! Job manifest loading and validation.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: read a manifest from disk.
//! - `validate.rs`: structural sanity checks. Dependency problems (unknown
//!   names, cycles, output races) are deliberately *not* load errors; the
//!   gate turns them into per-job verdicts.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{JobConfig, Manifest, OptionsSection, RawManifest};
