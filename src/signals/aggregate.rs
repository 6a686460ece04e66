//! Weighted combination of several signal providers.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::core::errors::{Result, SigError};
use crate::core::states::State;
use crate::signals::SignalProvider;
use crate::signals::score_map::ScoreMap;

/// A provider and its share of the composite.
pub type WeightedProvider = (Arc<dyn SignalProvider>, f64);

fn validate_weights(weights: impl IntoIterator<Item = f64>) -> Result<f64> {
    let mut total = 0.0;
    let mut count = 0_usize;
    for weight in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SigError::InvalidConfig {
                details: format!("signal weight must be finite and non-negative, got {weight}"),
            });
        }
        total += weight;
        count += 1;
    }
    if count == 0 {
        return Err(SigError::InvalidConfig {
            details: "no signals to aggregate".to_string(),
        });
    }
    if total <= 0.0 {
        return Err(SigError::InvalidConfig {
            details: "signal weights sum to zero".to_string(),
        });
    }
    if !total.is_finite() {
        return Err(SigError::InvalidConfig {
            details: format!("signal weights overflow when summed across {count} signals"),
        });
    }
    Ok(total)
}

/// Weighted mean of already-computed mappings.
pub fn combine(weighted: &[(ScoreMap, f64)]) -> Result<ScoreMap> {
    let total = validate_weights(weighted.iter().map(|(_, weight)| *weight))?;
    let scores: BTreeMap<State, f64> = State::ALL
        .iter()
        .map(|&state| {
            let sum: f64 = weighted
                .iter()
                .map(|(map, weight)| map.get(state) * weight)
                .sum();
            (state, sum / total)
        })
        .collect();
    ScoreMap::from_scores(scores)
}

/// Run every provider concurrently and blend their mappings.
///
/// Fails as soon as any provider fails; the remaining tasks are aborted when
/// the join set is dropped. Must be called from within a tokio runtime.
pub async fn aggregate(providers: &[WeightedProvider]) -> Result<ScoreMap> {
    validate_weights(providers.iter().map(|(_, weight)| *weight))?;

    let mut tasks = JoinSet::new();
    for (index, (provider, _)) in providers.iter().enumerate() {
        let provider = Arc::clone(provider);
        tasks.spawn(async move { (index, provider.scores().await) });
    }

    let mut results: Vec<Option<ScoreMap>> = vec![None; providers.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, outcome) = joined.map_err(|e| SigError::Runtime {
            details: format!("signal task failed: {e}"),
        })?;
        let name = providers[index].0.name();
        match outcome {
            Ok(map) => {
                debug!(signal = name, "signal resolved");
                results[index] = Some(map);
            }
            Err(e) => {
                warn!(signal = name, error = %e, "signal failed; aborting aggregate");
                return Err(SigError::ProviderFailed {
                    provider: name.to_string(),
                    details: e.to_string(),
                });
            }
        }
    }

    let weighted: Vec<(ScoreMap, f64)> = results
        .into_iter()
        .zip(providers)
        .map(|(map, (provider, weight))| {
            map.map(|map| (map, *weight))
                .ok_or_else(|| SigError::ProviderFailed {
                    provider: provider.name().to_string(),
                    details: "provider produced no result".to_string(),
                })
        })
        .collect::<Result<_>>()?;
    combine(&weighted)
}
