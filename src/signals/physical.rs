//! Physical signal: climate comfort score per state.
//!
//! Each state's score blends how close its mean temperature and annual
//! precipitation sit to a configured ideal. Distance is measured in units of
//! the configured tolerance and saturates at one tolerance away, so every
//! score lands in `[0, 1]` and a state exactly at the ideal scores `1.0`.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::config::{Config, PhysicalConfig};
use crate::core::errors::{Result, SigError};
use crate::signals::SignalProvider;
use crate::signals::score_map::ScoreMap;
use crate::signals::source::{
    BuiltinSource, PhysicalProfile, PhysicalSource, index_profiles, source_from_config,
};

/// Signal name reported in logs and run records.
pub const PHYSICAL_SIGNAL: &str = "physical";

/// Fit in `[0, 1]`: 1 at the ideal, falling linearly to 0 at one tolerance.
/// Non-finite input yields NaN so the caller can reject it.
fn fit(value: f64, ideal: f64, tolerance: f64) -> f64 {
    if !value.is_finite() {
        return f64::NAN;
    }
    1.0 - ((value - ideal).abs() / tolerance).min(1.0)
}

/// Score a single profile. `config` is assumed validated.
#[must_use]
pub fn score_profile(config: &PhysicalConfig, profile: &PhysicalProfile) -> f64 {
    let temp_fit = fit(
        profile.avg_temp_f,
        config.ideal_temp_f,
        config.temp_tolerance_f,
    );
    let precip_fit = fit(
        profile.annual_precip_in,
        config.ideal_precip_in,
        config.precip_tolerance_in,
    );
    let total_weight = config.temp_weight + config.precip_weight;
    let blended =
        config.temp_weight.mul_add(temp_fit, config.precip_weight * precip_fit) / total_weight;
    blended.clamp(0.0, 1.0)
}

/// Configurable physical score provider.
pub struct PhysicalScorer {
    config: PhysicalConfig,
    source: Box<dyn PhysicalSource>,
}

impl PhysicalScorer {
    /// # Errors
    /// Returns [`SigError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: PhysicalConfig, source: Box<dyn PhysicalSource>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    /// Default parameters over the built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            config: PhysicalConfig::default(),
            source: Box::new(BuiltinSource),
        }
    }

    /// Parameters from `[physical]`, profiles from `[data]`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.physical, source_from_config(&config.data))
    }

    /// Validated scoring parameters.
    #[must_use]
    pub fn config(&self) -> &PhysicalConfig {
        &self.config
    }

    /// Origin of the profiles, e.g. `builtin` or `file:/path`.
    #[must_use]
    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}

#[async_trait]
impl SignalProvider for PhysicalScorer {
    fn name(&self) -> &str {
        PHYSICAL_SIGNAL
    }

    async fn scores(&self) -> Result<ScoreMap> {
        let started = Instant::now();
        let source_name = self.source.describe();
        let rows = self.source.load().await?;
        let profiles = index_profiles(rows, &source_name)?;

        let mut scores = BTreeMap::new();
        for (state, profile) in &profiles {
            let score = score_profile(&self.config, profile);
            if !score.is_finite() {
                return Err(SigError::NonFiniteScore {
                    state: *state,
                    value: score,
                });
            }
            debug!(%state, score, "scored state");
            scores.insert(*state, score);
        }

        let map = ScoreMap::from_scores(scores)?;
        info!(
            signal = PHYSICAL_SIGNAL,
            source = %source_name,
            states = map.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "physical scores computed"
        );
        Ok(map)
    }
}
