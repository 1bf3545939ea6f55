use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use rusbank_ai::Weights;
use serde::{Deserialize, Serialize};

/// Weights-file schema version this build reads and writes.
pub const WEIGHTS_FILE_VERSION: u32 = 1;

/// A self-describing trained-weights file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsFile {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub fitness: f32,
    pub weights: Weights,
}

impl WeightsFile {
    #[must_use]
    pub fn new(fitness: f32, weights: Weights) -> Self {
        Self {
            version: WEIGHTS_FILE_VERSION,
            timestamp: Utc::now(),
            fitness,
            weights,
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open weights file: {}", path.display()))?;
        let loaded: WeightsFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse weights file: {}", path.display()))?;
        anyhow::ensure!(
            loaded.version == WEIGHTS_FILE_VERSION,
            "unsupported weights file version {} in {} (expected {WEIGHTS_FILE_VERSION})",
            loaded.version,
            path.display(),
        );
        Ok(loaded)
    }
}
