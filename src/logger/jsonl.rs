//! Append-only JSONL record of scoring runs.
//!
//! One line per run. A failed append is reported through `tracing` and never
//! fails the run that produced the record.

#![allow(missing_docs)]

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::errors::{Result, SigError};
use crate::signals::ScoreMap;

/// A single scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRunRecord {
    /// RFC 3339 UTC timestamp.
    pub ts: String,
    pub signal: String,
    pub source: String,
    pub states: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub elapsed_ms: u64,
}

impl ScoreRunRecord {
    #[must_use]
    pub fn from_scores(
        signal: &str,
        source: &str,
        scores: &ScoreMap,
        elapsed: Duration,
        at: DateTime<Utc>,
    ) -> Self {
        let summary = scores.summary();
        Self {
            ts: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            signal: signal.to_string(),
            source: source.to_string(),
            states: scores.len(),
            min: summary.min,
            max: summary.max,
            mean: summary.mean,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Writer for the JSONL run log.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file and parent directories as needed.
    pub fn append(&self, record: &ScoreRunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SigError::io(parent, e))?;
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SigError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| SigError::io(&self.path, e))
    }

    /// Append, degrading to a warning on failure. Returns whether it was written.
    pub fn append_or_warn(&self, record: &ScoreRunRecord) -> bool {
        match self.append(record) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "run log append failed");
                false
            }
        }
    }

    /// Read every record back, skipping malformed lines.
    pub fn read_all(&self) -> Result<Vec<ScoreRunRecord>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| SigError::io(&self.path, e))?;
        Ok(raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}
