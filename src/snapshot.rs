use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use thiserror::Error;

use crate::world::{World, WorldSnapshot};

/// Writes interval-gated observation snapshots. These are diagnostics for
/// humans and dashboards, not a save format; an interval of 0 disables
/// writing entirely.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval: u64,
}

#[derive(Serialize)]
struct SnapshotDocument {
    generated_at: String,
    #[serde(flatten)]
    world: WorldSnapshot,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn maybe_write(
        &self,
        world: &World,
        scenario: &str,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        if self.interval == 0 || world.tick() % self.interval != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("tick_{:06}.json", world.tick()));
        let document = SnapshotDocument {
            generated_at: chrono::Local::now().to_rfc3339(),
            world: world.snapshot(scenario),
        };
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        Ok(Some(path))
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
