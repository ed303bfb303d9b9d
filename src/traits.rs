//! Big-Five (OCEAN) trait vocabulary
//!
//! Score vectors, categorical levels and level profiles shared by the model,
//! the aggregator and the interpreter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of traits emitted per prediction.
pub const TRAIT_COUNT: usize = 5;

/// Scores strictly below this are `Low`.
pub const LOW_THRESHOLD: f64 = 0.35;
/// Scores strictly above this are `High`.
pub const HIGH_THRESHOLD: f64 = 0.65;

/// One of the five OCEAN traits, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Extraversion,
    Neuroticism,
    Agreeableness,
    Conscientiousness,
    Openness,
}

impl Trait {
    /// Declaration order. Summaries, tie-breaks and model outputs follow it.
    pub const ALL: [Trait; TRAIT_COUNT] = [
        Trait::Extraversion,
        Trait::Neuroticism,
        Trait::Agreeableness,
        Trait::Conscientiousness,
        Trait::Openness,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Trait::Extraversion => "extraversion",
            Trait::Neuroticism => "neuroticism",
            Trait::Agreeableness => "agreeableness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Openness => "openness",
        }
    }

    /// Label column in the myPersonality corpus layout.
    pub fn corpus_column(self) -> &'static str {
        match self {
            Trait::Extraversion => "sEXT",
            Trait::Neuroticism => "sNEU",
            Trait::Agreeableness => "sAGR",
            Trait::Conscientiousness => "sCON",
            Trait::Openness => "sOPN",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Five real-valued trait scores for one text.
///
/// Model output is unbounded; training labels usually sit in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraitScores {
    pub extraversion: f64,
    pub neuroticism: f64,
    pub agreeableness: f64,
    pub conscientiousness: f64,
    pub openness: f64,
}

impl TraitScores {
    pub fn from_array(values: [f64; TRAIT_COUNT]) -> Self {
        Self {
            extraversion: values[0],
            neuroticism: values[1],
            agreeableness: values[2],
            conscientiousness: values[3],
            openness: values[4],
        }
    }

    pub fn to_array(&self) -> [f64; TRAIT_COUNT] {
        [
            self.extraversion,
            self.neuroticism,
            self.agreeableness,
            self.conscientiousness,
            self.openness,
        ]
    }

    pub fn get(&self, t: Trait) -> f64 {
        self.to_array()[t.index()]
    }

    /// `(trait, score)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        Trait::ALL.into_iter().map(move |t| (t, self.get(t)))
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Per-trait mean over one or more [`TraitScores`] of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedScores {
    pub scores: TraitScores,
    /// Number of predictions averaged (always at least one).
    pub sample_count: usize,
}

impl AggregatedScores {
    pub fn get(&self, t: Trait) -> f64 {
        self.scores.get(t)
    }

    pub fn levels(&self) -> TraitLevelProfile {
        TraitLevelProfile::from_scores(&self.scores)
    }
}

/// Categorical bucket for a single trait score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitLevel {
    Low,
    Medium,
    High,
}

impl TraitLevel {
    /// Strict inequalities: 0.35 and 0.65 themselves are `Medium`.
    pub fn classify(score: f64) -> Self {
        if score < LOW_THRESHOLD {
            TraitLevel::Low
        } else if score > HIGH_THRESHOLD {
            TraitLevel::High
        } else {
            TraitLevel::Medium
        }
    }

    /// Representative value used to rank how extreme a level is.
    pub fn numeric(self) -> f64 {
        match self {
            TraitLevel::Low => 0.25,
            TraitLevel::Medium => 0.5,
            TraitLevel::High => 0.75,
        }
    }

    /// Distance of the representative value from the midpoint.
    pub fn extremity(self) -> f64 {
        (0.5 - self.numeric()).abs()
    }

    pub fn name(self) -> &'static str {
        match self {
            TraitLevel::Low => "low",
            TraitLevel::Medium => "medium",
            TraitLevel::High => "high",
        }
    }
}

impl fmt::Display for TraitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Levels for all five traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitLevelProfile {
    levels: [TraitLevel; TRAIT_COUNT],
}

impl TraitLevelProfile {
    pub fn new(levels: [TraitLevel; TRAIT_COUNT]) -> Self {
        Self { levels }
    }

    /// All traits at `Medium`; tests and callers adjust from there.
    pub fn neutral() -> Self {
        Self::new([TraitLevel::Medium; TRAIT_COUNT])
    }

    pub fn from_scores(scores: &TraitScores) -> Self {
        let mut levels = [TraitLevel::Medium; TRAIT_COUNT];
        for (t, score) in scores.iter() {
            levels[t.index()] = TraitLevel::classify(score);
        }
        Self { levels }
    }

    pub fn with(mut self, t: Trait, level: TraitLevel) -> Self {
        self.levels[t.index()] = level;
        self
    }

    pub fn level(&self, t: Trait) -> TraitLevel {
        self.levels[t.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, TraitLevel)> + '_ {
        Trait::ALL.into_iter().map(move |t| (t, self.level(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(TraitLevel::classify(0.34), TraitLevel::Low);
        assert_eq!(TraitLevel::classify(0.35), TraitLevel::Medium);
        assert_eq!(TraitLevel::classify(0.65), TraitLevel::Medium);
        assert_eq!(TraitLevel::classify(0.66), TraitLevel::High);
        assert_eq!(TraitLevel::classify(-3.0), TraitLevel::Low);
        assert_eq!(TraitLevel::classify(1.7), TraitLevel::High);
    }

    #[test]
    fn test_scores_follow_declaration_order() {
        let scores = TraitScores::from_array([0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(scores.get(Trait::Neuroticism), 0.2);
        assert_eq!(scores.get(Trait::Openness), 0.5);
        let names: Vec<_> = scores.iter().map(|(t, _)| t.name()).collect();
        assert_eq!(
            names,
            ["extraversion", "neuroticism", "agreeableness", "conscientiousness", "openness"]
        );
    }

    #[test]
    fn test_profile_from_scores() {
        let profile = TraitLevelProfile::from_scores(&TraitScores::from_array([0.9, 0.1, 0.5, 0.65, 0.35]));
        assert_eq!(profile.level(Trait::Extraversion), TraitLevel::High);
        assert_eq!(profile.level(Trait::Neuroticism), TraitLevel::Low);
        assert_eq!(profile.level(Trait::Conscientiousness), TraitLevel::Medium);
        assert_eq!(profile.level(Trait::Openness), TraitLevel::Medium);
    }
}
