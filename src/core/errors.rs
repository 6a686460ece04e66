//! SIG-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::states::State;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SigError>;

/// Top-level error type for state signal scoring.
#[derive(Debug, Error)]
pub enum SigError {
    #[error("[SIG-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SIG-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SIG-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SIG-2001] unknown state code {code:?}")]
    UnknownState { code: String },

    #[error("[SIG-2002] state {state} appears more than once in {source_name}")]
    DuplicateState { state: State, source_name: String },

    #[error("[SIG-2003] no score for {} state(s): {}", missing.len(), join_codes(missing))]
    MissingStates { missing: Vec<State> },

    #[error("[SIG-2004] non-finite score for {state}: {value}")]
    NonFiniteScore { state: State, value: f64 },

    #[error("[SIG-2005] checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("[SIG-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SIG-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[SIG-3002] signal provider {provider} failed: {details}")]
    ProviderFailed {
        provider: String,
        details: String,
    },

    #[error("[SIG-3900] runtime failure: {details}")]
    Runtime { details: String },
}

fn join_codes(states: &[State]) -> String {
    states
        .iter()
        .map(|state| state.code())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SigError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SIG-1001",
            Self::MissingConfig { .. } => "SIG-1002",
            Self::ConfigParse { .. } => "SIG-1003",
            Self::UnknownState { .. } => "SIG-2001",
            Self::DuplicateState { .. } => "SIG-2002",
            Self::MissingStates { .. } => "SIG-2003",
            Self::NonFiniteScore { .. } => "SIG-2004",
            Self::ChecksumMismatch { .. } => "SIG-2005",
            Self::Serialization { .. } => "SIG-2101",
            Self::Io { .. } => "SIG-3001",
            Self::ProviderFailed { .. } => "SIG-3002",
            Self::Runtime { .. } => "SIG-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::ProviderFailed { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SigError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
