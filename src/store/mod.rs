//! Best-score persistence
//!
//! The engine only sees the [`ScoreStore`] trait. Two stores ship with the
//! crate: an in-process one for tests and `--no-persist`, and a JSON file
//! store used by the terminal front-end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persists the best score across sessions
pub trait ScoreStore {
    /// Stored best score, 0 when nothing was stored yet
    fn read_best(&self) -> Result<u32>;

    fn write_best(&mut self, score: u32) -> Result<()>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn read_best(&self) -> Result<u32> {
        (**self).read_best()
    }

    fn write_best(&mut self, score: u32) -> Result<()> {
        (**self).write_best(score)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    best: Option<u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self { best: Some(best) }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read_best(&self) -> Result<u32> {
        Ok(self.best.unwrap_or(0))
    }

    fn write_best(&mut self, score: u32) -> Result<()> {
        self.best = Some(score);
        Ok(())
    }
}

/// On-disk document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u32,
}

/// Stores the best score as a small JSON document
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn read_best(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read best score from {:?}", self.path))?;
        let record: BestScoreRecord = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse best score file {:?}", self.path))?;

        Ok(record.best_score)
    }

    fn write_best(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let record = BestScoreRecord { best_score: score };
        let json =
            serde_json::to_string_pretty(&record).context("Failed to serialize best score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write best score to {:?}", self.path))?;

        Ok(())
    }
}
