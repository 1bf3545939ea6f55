//! Training-state persistence.
//!
//! A checkpoint captures everything needed to resume a run: configuration,
//! population, history, counters. Saves are atomic (whole-file write to a
//! temporary sibling, then rename) so an interrupted save never corrupts
//! an existing checkpoint. Loads reject any schema version other than the
//! current one.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    genetic::Individual,
    trainer::{GenerationSummary, TrainerConfig},
};

/// The only checkpoint schema this build reads or writes.
pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CheckpointError {
    #[display("checkpoint I/O failed: {_0}")]
    Io(std::io::Error),
    #[display("checkpoint is not valid JSON: {_0}")]
    Json(serde_json::Error),
    #[display("unsupported checkpoint version {found} (expected {CHECKPOINT_VERSION})")]
    #[from(ignore)]
    UnsupportedVersion { found: u32 },
}

/// The complete persisted training state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub config: TrainerConfig,
    pub current_generation: u32,
    pub best_individual: Individual,
    pub all_time_best: Individual,
    pub population: Vec<Individual>,
    pub generation_history: Vec<GenerationSummary>,
    pub start_time: DateTime<Utc>,
    pub total_games_played: u64,
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    version: u32,
}

impl Checkpoint {
    /// Writes the checkpoint atomically: serialize to `<path>.tmp`, flush,
    /// rename over `path`.
    pub fn save(&self, path: &Path) -> Result<(), CheckpointError> {
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Loads a checkpoint, rejecting unsupported schema versions before
    /// attempting a full parse.
    pub fn load(path: &Path) -> Result<Self, CheckpointError> {
        let bytes = fs::read(path)?;
        let probe: VersionProbe = serde_json::from_slice(&bytes)?;
        if probe.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: probe.version,
            });
        }
        let file = File::open(path)?;
        let checkpoint = serde_json::from_reader(BufReader::new(file))?;
        Ok(checkpoint)
    }
}
