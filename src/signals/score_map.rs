//! Complete state → score mapping.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::errors::{Result, SigError};
use crate::core::states::State;

/// A score for every state in [`State::ALL`], no more and no fewer.
///
/// The only constructor is [`ScoreMap::from_scores`], which rejects partial
/// or non-finite input, so holders can index any state without checking.
/// Serializes as a JSON object keyed by postal code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreMap {
    scores: BTreeMap<State, f64>,
}

/// Distribution summary of one mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ScoreMap {
    /// Validate completeness and finiteness.
    ///
    /// # Errors
    /// [`SigError::MissingStates`] lists every absent state;
    /// [`SigError::NonFiniteScore`] names the first NaN or infinite value.
    pub fn from_scores(scores: BTreeMap<State, f64>) -> Result<Self> {
        let missing: Vec<State> = State::ALL
            .iter()
            .copied()
            .filter(|state| !scores.contains_key(state))
            .collect();
        if !missing.is_empty() {
            return Err(SigError::MissingStates { missing });
        }
        if let Some((&state, &value)) = scores.iter().find(|(_, value)| !value.is_finite()) {
            return Err(SigError::NonFiniteScore { state, value });
        }
        Ok(Self { scores })
    }

    /// Score for `state`. Present for every state by construction.
    #[must_use]
    pub fn get(&self, state: State) -> f64 {
        self.scores[&state]
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, f64)> + '_ {
        self.scores.iter().map(|(&state, &score)| (state, score))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Always false: a valid mapping covers the whole enumeration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Postal codes of every key, in enumeration order.
    #[must_use]
    pub fn codes(&self) -> Vec<&'static str> {
        self.scores.keys().map(|state| state.code()).collect()
    }

    /// Entries sorted by descending score; ties keep enumeration order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(State, f64)> {
        let mut entries: Vec<(State, f64)> = self.iter().collect();
        entries.sort_by(|left, right| right.1.total_cmp(&left.1).then(left.0.cmp(&right.0)));
        entries
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> ScoreSummary {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for (_, score) in self.iter() {
            min = min.min(score);
            max = max.max(score);
            sum += score;
        }
        ScoreSummary {
            min,
            max,
            mean: sum / self.scores.len() as f64,
        }
    }
}

/// Rejects repeated keys, including case variants such as `"AL"` and `"al"`,
/// which would otherwise collapse onto one state.
struct ScoreMapVisitor;

impl<'de> Visitor<'de> for ScoreMapVisitor {
    type Value = ScoreMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping every state code to a score")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<ScoreMap, A::Error> {
        let mut scores = BTreeMap::new();
        while let Some((state, score)) = access.next_entry::<State, f64>()? {
            if scores.insert(state, score).is_some() {
                return Err(de::Error::custom(SigError::DuplicateState {
                    state,
                    source_name: "score mapping".to_string(),
                }));
            }
        }
        ScoreMap::from_scores(scores).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ScoreMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ScoreMapVisitor)
    }
}
