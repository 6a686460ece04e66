//! Physical profile sources: the compiled-in table and external dataset files.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::config::DataConfig;
use crate::core::errors::{Result, SigError};
use crate::core::states::State;

/// Statewide annual climate normals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProfile {
    pub avg_temp_f: f64,
    pub annual_precip_in: f64,
}

/// Anything that can supply per-state physical profiles.
#[async_trait]
pub trait PhysicalSource: Send + Sync {
    /// Raw rows, in source order. Duplicates and gaps are checked by the caller.
    async fn load(&self) -> Result<Vec<(State, PhysicalProfile)>>;

    /// Human-readable origin, used in logs and duplicate-row errors.
    fn describe(&self) -> String;
}

/// Pick the source named by `[data]`, falling back to the built-in table.
#[must_use]
pub fn source_from_config(data: &DataConfig) -> Box<dyn PhysicalSource> {
    match &data.path {
        Some(path) => Box::new(FileSource::new(path.clone(), data.sha256.clone())),
        None => Box::new(BuiltinSource),
    }
}

/// Collapse rows into a per-state index, rejecting repeated states.
pub fn index_profiles(
    rows: Vec<(State, PhysicalProfile)>,
    source_name: &str,
) -> Result<BTreeMap<State, PhysicalProfile>> {
    let mut index = BTreeMap::new();
    for (state, profile) in rows {
        if index.insert(state, profile).is_some() {
            return Err(SigError::DuplicateState {
                state,
                source_name: source_name.to_string(),
            });
        }
    }
    Ok(index)
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

/// Approximate statewide annual mean temperature (°F) and precipitation (in).
const BUILTIN_PROFILES: &[(State, f64, f64)] = &[
    (State::Alabama, 62.8, 58.3),
    (State::Alaska, 26.6, 22.5),
    (State::Arizona, 60.3, 13.6),
    (State::Arkansas, 60.4, 50.6),
    (State::California, 59.4, 22.2),
    (State::Colorado, 45.1, 15.9),
    (State::Connecticut, 49.0, 50.3),
    (State::Delaware, 55.3, 45.7),
    (State::Florida, 70.7, 54.5),
    (State::Georgia, 63.5, 50.7),
    (State::Hawaii, 70.0, 63.7),
    (State::Idaho, 44.4, 18.9),
    (State::Illinois, 51.8, 39.2),
    (State::Indiana, 51.7, 41.7),
    (State::Iowa, 47.8, 34.0),
    (State::Kansas, 54.3, 28.9),
    (State::Kentucky, 55.6, 48.9),
    (State::Louisiana, 66.4, 60.1),
    (State::Maine, 41.0, 42.2),
    (State::Maryland, 54.2, 44.5),
    (State::Massachusetts, 47.9, 47.7),
    (State::Michigan, 44.4, 32.8),
    (State::Minnesota, 41.2, 27.3),
    (State::Mississippi, 63.4, 59.0),
    (State::Missouri, 54.5, 42.2),
    (State::Montana, 42.7, 15.3),
    (State::Nebraska, 48.8, 23.6),
    (State::Nevada, 49.9, 9.5),
    (State::NewHampshire, 43.8, 43.4),
    (State::NewJersey, 52.7, 47.1),
    (State::NewMexico, 53.4, 14.6),
    (State::NewYork, 45.4, 41.8),
    (State::NorthCarolina, 59.0, 50.3),
    (State::NorthDakota, 40.4, 17.8),
    (State::Ohio, 50.7, 39.1),
    (State::Oklahoma, 59.6, 36.5),
    (State::Oregon, 48.4, 27.4),
    (State::Pennsylvania, 48.8, 42.9),
    (State::RhodeIsland, 50.1, 47.9),
    (State::SouthCarolina, 62.4, 49.8),
    (State::SouthDakota, 45.2, 20.1),
    (State::Tennessee, 57.6, 54.2),
    (State::Texas, 64.8, 28.9),
    (State::Utah, 48.6, 12.2),
    (State::Vermont, 42.9, 42.7),
    (State::Virginia, 55.1, 44.3),
    (State::Washington, 48.3, 38.4),
    (State::WestVirginia, 51.8, 45.2),
    (State::Wisconsin, 43.1, 32.6),
    (State::Wyoming, 42.0, 12.9),
];

/// The compiled-in table. Covers every state.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

#[async_trait]
impl PhysicalSource for BuiltinSource {
    async fn load(&self) -> Result<Vec<(State, PhysicalProfile)>> {
        Ok(BUILTIN_PROFILES
            .iter()
            .map(|&(state, avg_temp_f, annual_precip_in)| {
                (
                    state,
                    PhysicalProfile {
                        avg_temp_f,
                        annual_precip_in,
                    },
                )
            })
            .collect())
    }

    fn describe(&self) -> String {
        "builtin".to_string()
    }
}

// ---------------------------------------------------------------------------
// Dataset files
// ---------------------------------------------------------------------------

/// One dataset row. `code` stays a string so unknown codes surface as
/// [`SigError::UnknownState`] instead of a generic parse failure.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    code: String,
    avg_temp_f: f64,
    annual_precip_in: f64,
}

#[derive(Debug, Deserialize)]
struct ProfileDocument {
    #[serde(rename = "state", default)]
    rows: Vec<ProfileRow>,
}

/// A TOML (`[[state]]` tables) or JSON (array of rows) dataset on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    expected_sha256: Option<String>,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, expected_sha256: Option<String>) -> Self {
        Self {
            path,
            expected_sha256,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn verify_checksum(&self, bytes: &[u8]) -> Result<()> {
        let Some(expected) = &self.expected_sha256 else {
            return Ok(());
        };
        let actual = format!("{:x}", Sha256::digest(bytes));
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(SigError::ChecksumMismatch {
                path: self.path.clone(),
                expected: expected.clone(),
                actual,
            });
        }
        Ok(())
    }

    fn parse(&self, text: &str) -> Result<Vec<(State, PhysicalProfile)>> {
        let is_json = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let rows = if is_json {
            serde_json::from_str::<Vec<ProfileRow>>(text)?
        } else {
            toml::from_str::<ProfileDocument>(text)
                .map_err(|e| SigError::Serialization {
                    context: "dataset toml",
                    details: e.to_string(),
                })?
                .rows
        };
        rows.into_iter()
            .map(|row| -> Result<(State, PhysicalProfile)> {
                let state = row.code.parse::<State>()?;
                Ok((
                    state,
                    PhysicalProfile {
                        avg_temp_f: row.avg_temp_f,
                        annual_precip_in: row.annual_precip_in,
                    },
                ))
            })
            .collect()
    }
}

#[async_trait]
impl PhysicalSource for FileSource {
    async fn load(&self) -> Result<Vec<(State, PhysicalProfile)>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SigError::io(&self.path, e))?;
        self.verify_checksum(&bytes)?;
        let text = String::from_utf8(bytes).map_err(|e| SigError::Serialization {
            context: "dataset utf-8",
            details: e.to_string(),
        })?;
        let rows = self.parse(&text)?;
        debug!(path = %self.path.display(), rows = rows.len(), "loaded physical dataset");
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
