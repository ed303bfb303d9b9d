//! Personality Interpreter
//!
//! Rule engine turning aggregated trait scores into levels, descriptive
//! phrases, cross-trait insights and relationship / career insights. Every
//! choice is deterministic: the same scores always produce the same text.

use super::aggregator::aggregate;
use super::summary::{LifeInsights, PersonalitySummary, ProfileSummary};
use super::tables::{career_insight, phrases, relationship_insight, COMBINATION_RULES, POOL_SIZE};
use crate::traits::{AggregatedScores, Trait, TraitLevel, TraitLevelProfile, TraitScores};

/// Upper bound on combination insights per summary.
pub const MAX_COMBINATION_INSIGHTS: usize = 3;
/// Number of most-extreme traits considered for life insights.
pub const LIFE_INSIGHT_TRAITS: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalityInterpreter;

impl PersonalityInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, score: f64) -> TraitLevel {
        TraitLevel::classify(score)
    }

    /// Phrase at `floor((score * 100) mod 5)` in the trait/level pool.
    pub fn describe(&self, t: Trait, score: f64) -> &'static str {
        let pool = phrases(t, self.classify(score));
        pool[phrase_index(score, pool.len())]
    }

    /// First matching rules in declaration order, capped at three.
    pub fn combination_insights(&self, profile: &TraitLevelProfile) -> Vec<&'static str> {
        COMBINATION_RULES
            .iter()
            .filter(|rule| rule.conditions.iter().all(|&(t, level)| profile.level(t) == level))
            .take(MAX_COMBINATION_INSIGHTS)
            .map(|rule| rule.insight)
            .collect()
    }

    /// Relationship and career lines for the two most extreme traits.
    ///
    /// Ties keep declaration order; medium traits among the two add nothing.
    pub fn life_insights(&self, profile: &TraitLevelProfile) -> LifeInsights {
        let mut ranked: Vec<(Trait, TraitLevel)> = profile.iter().collect();
        // Stable sort: equal extremity keeps declaration order.
        ranked.sort_by(|a, b| b.1.extremity().total_cmp(&a.1.extremity()));

        let mut insights = LifeInsights::default();
        for (t, level) in ranked.into_iter().take(LIFE_INSIGHT_TRAITS) {
            if let (Some(rel), Some(career)) = (relationship_insight(t, level), career_insight(t, level)) {
                insights.relationships.push(rel.to_string());
                insights.career.push(career.to_string());
            }
        }
        insights
    }

    pub fn summarize(&self, aggregated: &AggregatedScores) -> PersonalitySummary {
        let levels = aggregated.levels();
        let trait_descriptions = aggregated
            .scores
            .iter()
            .map(|(t, score)| (t, self.describe(t, score).to_string()))
            .collect();

        PersonalitySummary::Profile(ProfileSummary {
            levels,
            trait_descriptions,
            combination_insights: self
                .combination_insights(&levels)
                .into_iter()
                .map(str::to_string)
                .collect(),
            life: self.life_insights(&levels),
        })
    }

    /// Aggregate then summarize; no predictions yields the insufficient-data
    /// sentinel.
    pub fn summarize_scores(&self, predictions: &[TraitScores]) -> PersonalitySummary {
        match aggregate(predictions) {
            Some(aggregated) => self.summarize(&aggregated),
            None => PersonalitySummary::InsufficientData,
        }
    }
}

fn phrase_index(score: f64, pool_size: usize) -> usize {
    debug_assert_eq!(pool_size, POOL_SIZE);
    let raw = (score * 100.0).rem_euclid(pool_size as f64).floor();
    if raw.is_finite() {
        (raw as usize).min(pool_size - 1)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Trait::*;
    use crate::traits::TraitLevel::*;

    #[test]
    fn test_describe_is_deterministic_and_indexed() {
        let interp = PersonalityInterpreter::new();
        // 0.8 * 100 = 80 → 80 mod 5 = 0
        assert_eq!(
            interp.describe(Extraversion, 0.8),
            "thrives in social situations and enjoys meeting new people"
        );
        // 0.72 * 100 = 72 → 2
        assert_eq!(interp.describe(Openness, 0.72), "actively seeks out different perspectives and worldviews");
        // 0.5 * 100 = 50 → 0
        assert_eq!(
            interp.describe(Neuroticism, 0.5),
            "experiences a normal range of emotional ups and downs"
        );
        assert_eq!(interp.describe(Agreeableness, 0.1), interp.describe(Agreeableness, 0.1));
    }

    #[test]
    fn test_describe_handles_negative_and_nan_scores() {
        let interp = PersonalityInterpreter::new();
        // -0.03 * 100 = -3 → rem_euclid 5 = 2
        assert_eq!(interp.describe(Conscientiousness, -0.03), "prefers to keep options open rather than make rigid plans");
        assert_eq!(
            interp.describe(Openness, f64::NAN),
            "balances traditional approaches with occasional new ideas"
        );
    }

    #[test]
    fn test_combination_cap_keeps_rule_order() {
        let interp = PersonalityInterpreter::new();
        let profile = TraitLevelProfile::neutral()
            .with(Extraversion, High)
            .with(Openness, High)
            .with(Conscientiousness, High)
            .with(Agreeableness, High)
            .with(Neuroticism, Low);
        let insights = interp.combination_insights(&profile);
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0], COMBINATION_RULES[0].insight);
        assert_eq!(insights[1], COMBINATION_RULES[1].insight);
        assert_eq!(insights[2], COMBINATION_RULES[2].insight);
    }

    #[test]
    fn test_three_trait_rule_requires_all_conditions() {
        let interp = PersonalityInterpreter::new();
        let profile = TraitLevelProfile::neutral()
            .with(Extraversion, Low)
            .with(Openness, Low)
            .with(Conscientiousness, High);
        let insights = interp.combination_insights(&profile);
        assert_eq!(
            insights,
            vec![
                "works effectively on independent projects requiring focus and attention to detail",
                "works diligently within established systems, valuing reliability and tradition",
            ]
        );
    }

    #[test]
    fn test_all_medium_profile_has_no_extras() {
        let interp = PersonalityInterpreter::new();
        let profile = TraitLevelProfile::neutral();
        assert!(interp.combination_insights(&profile).is_empty());
        assert_eq!(interp.life_insights(&profile), LifeInsights::default());
    }

    #[test]
    fn test_life_insights_tie_break_is_declaration_order() {
        let interp = PersonalityInterpreter::new();
        let profile = TraitLevelProfile::neutral()
            .with(Agreeableness, Low)
            .with(Neuroticism, High)
            .with(Openness, High);
        for _ in 0..5 {
            let life = interp.life_insights(&profile);
            assert_eq!(
                life.relationships,
                vec![
                    "appreciates partners who provide emotional support and understanding",
                    "values straightforward communication and honest exchanges",
                ]
            );
            assert_eq!(life.career.len(), 2);
        }
    }

    #[test]
    fn test_life_insights_skip_medium_among_top_two() {
        let interp = PersonalityInterpreter::new();
        let profile = TraitLevelProfile::neutral().with(Openness, High);
        let life = interp.life_insights(&profile);
        assert_eq!(
            life.relationships,
            vec!["enjoys exploring new experiences and intellectual discussions with partners"]
        );
        assert_eq!(
            life.career,
            vec!["often enjoys creative fields, research, or positions involving innovation"]
        );
    }

    #[test]
    fn test_summarize_scores_without_predictions() {
        let interp = PersonalityInterpreter::new();
        assert!(interp.summarize_scores(&[]).is_insufficient());
    }

    #[test]
    fn test_summary_lists_traits_in_fixed_order() {
        let interp = PersonalityInterpreter::new();
        let summary = interp.summarize_scores(&[TraitScores::from_array([0.9, 0.1, 0.5, 0.5, 0.5])]);
        let profile = summary.profile().unwrap();
        let order: Vec<Trait> = profile.trait_descriptions.iter().map(|(t, _)| *t).collect();
        assert_eq!(order, Trait::ALL.to_vec());
        assert_eq!(
            profile.combination_insights,
            vec!["brings confident energy to social situations and maintains optimism under pressure"]
        );
    }
}
