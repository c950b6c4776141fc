// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{Manifest, RawManifest};
use crate::errors::Result;

/// Read and deserialize a manifest without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawManifest> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawManifest = toml::from_str(&contents)?;
    Ok(raw)
}

/// Read, deserialize and validate a manifest.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Manifest> {
    let raw = load_from_path(&path)?;
    Manifest::try_from(raw)
}
