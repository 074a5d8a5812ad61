//! Manifest generation for reproducibility.
//!
//! Every output directory gets a `classgen.json` recording the seed,
//! profile, and options of the run, so any generated project can be
//! regenerated byte-for-byte.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation options stored in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub classes: usize,
    pub language: String,
    pub package: String,
}

/// The complete manifest written to `classgen.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub seed: u64,
    pub profile: String,
    pub options: GenerationOptions,
    pub generated_at_epoch_secs: u64,
    pub generator_version: String,
}

impl Manifest {
    pub fn new(seed: u64, profile: String, options: GenerationOptions) -> Self {
        Self {
            seed,
            profile,
            options,
            generated_at_epoch_secs: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            generator_version: VERSION.to_string(),
        }
    }

    /// Write the manifest to a directory as `classgen.json`.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<()> {
        let path = dir.join("classgen.json");
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
