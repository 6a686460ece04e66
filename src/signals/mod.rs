//! Signal providers: per-state scores, physical scoring, and aggregation.

pub mod aggregate;
pub mod physical;
pub mod score_map;
pub mod source;

use async_trait::async_trait;

use crate::core::config::Config;
use crate::core::errors::Result;

pub use aggregate::{WeightedProvider, aggregate, combine};
pub use physical::{PHYSICAL_SIGNAL, PhysicalScorer};
pub use score_map::{ScoreMap, ScoreSummary};

/// Anything that produces a complete state → score mapping.
///
/// Implementations must fail rather than return a partial mapping; the
/// [`ScoreMap`] constructor enforces this.
#[async_trait]
pub trait SignalProvider: Send + Sync {
    /// Short stable name used in logs and aggregate errors.
    fn name(&self) -> &str;

    /// Compute a fresh mapping.
    async fn scores(&self) -> Result<ScoreMap>;
}

/// Physical score for every state, using default parameters and the
/// built-in climate table.
pub async fn get_physical_scores() -> Result<ScoreMap> {
    PhysicalScorer::builtin().scores().await
}

/// Physical score for every state under `config`.
pub async fn get_physical_scores_with(config: &Config) -> Result<ScoreMap> {
    PhysicalScorer::from_config(config)?.scores().await
}
