//! OCEAN Analysis Pipeline
//!
//! raw texts → (optional normalization) → encoding → prediction → per-text
//! results → average → summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::aggregator::aggregate;
use super::interpreter::PersonalityInterpreter;
use super::summary::{Insight, PersonalitySummary};
use crate::error::{PersonaError, Result};
use crate::model::{ArtifactBundle, TraitPredictor};
use crate::text::{SequenceEncoder, TextNormalizer};
use crate::traits::{AggregatedScores, TraitLevelProfile, TraitScores};

/// Prediction for one input text, paired with the text as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub text: String,
    pub scores: TraitScores,
}

/// Everything produced for one batch of a subject's texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub results: Vec<TextAnalysis>,
    pub average: Option<AggregatedScores>,
    pub levels: Option<TraitLevelProfile>,
    pub summary: PersonalitySummary,
}

/// Record handed to an external persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub subject: String,
    pub text_count: usize,
    pub average_scores: Option<TraitScores>,
    /// One comma-joined text per insight section
    pub insights: Vec<Insight>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn to_record(&self, subject: impl Into<String>) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4().to_string(),
            subject: subject.into(),
            text_count: self.results.len(),
            average_scores: self.average.map(|a| a.scores),
            insights: self.summary.grouped_insights(),
            created_at: Utc::now(),
        }
    }
}

pub struct OceanAnalyzer<P> {
    encoder: SequenceEncoder,
    predictor: P,
    normalizer: Option<TextNormalizer>,
    interpreter: PersonalityInterpreter,
}

impl OceanAnalyzer<Arc<ArtifactBundle>> {
    /// Analyzer over a loaded bundle, using the bundle's own encoder.
    pub fn from_bundle(bundle: Arc<ArtifactBundle>) -> Self {
        Self::new(bundle.encoder().clone(), bundle)
    }
}

impl<P: TraitPredictor> OceanAnalyzer<P> {
    pub fn new(encoder: SequenceEncoder, predictor: P) -> Self {
        Self {
            encoder,
            predictor,
            normalizer: None,
            interpreter: PersonalityInterpreter::new(),
        }
    }

    /// Run the text normalizer before encoding.
    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalizer = enabled.then(TextNormalizer::new);
        self
    }

    pub fn interpreter(&self) -> &PersonalityInterpreter {
        &self.interpreter
    }

    /// Score each text independently.
    pub fn analyze<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<TextAnalysis>> {
        let sequences = match &self.normalizer {
            Some(normalizer) => self.encoder.encode(&normalizer.normalize_batch(texts)),
            None => self.encoder.encode(texts),
        };
        let predictions = self.predictor.predict(&sequences)?;
        if predictions.len() != texts.len() {
            return Err(PersonaError::shape(
                format!("{} predictions", texts.len()),
                format!("{} predictions", predictions.len()),
            ));
        }
        debug!("Scored {} texts", texts.len());

        Ok(texts
            .iter()
            .zip(predictions)
            .map(|(text, scores)| TextAnalysis {
                text: text.as_ref().to_string(),
                scores,
            })
            .collect())
    }

    pub fn average_scores(&self, results: &[TextAnalysis]) -> Option<AggregatedScores> {
        let scores: Vec<TraitScores> = results.iter().map(|r| r.scores).collect();
        aggregate(&scores)
    }

    pub fn summarize(&self, results: &[TextAnalysis]) -> PersonalitySummary {
        match self.average_scores(results) {
            Some(average) => self.interpreter.summarize(&average),
            None => PersonalitySummary::InsufficientData,
        }
    }

    /// Per-text results and the subject-level summary in one pass.
    pub fn report<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<AnalysisReport> {
        let results = self.analyze(texts)?;
        let average = self.average_scores(&results);
        let summary = match &average {
            Some(a) => self.interpreter.summarize(a),
            None => PersonalitySummary::InsufficientData,
        };
        Ok(AnalysisReport {
            levels: average.map(|a| a.levels()),
            results,
            average,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::EncodedSequence;

    /// Predicts from the number of non-padding tokens.
    struct LengthPredictor;

    impl TraitPredictor for LengthPredictor {
        fn predict(&self, sequences: &[EncodedSequence]) -> Result<Vec<TraitScores>> {
            Ok(sequences
                .iter()
                .map(|s| {
                    let n = s.as_slice().iter().filter(|&&i| i != 0).count() as f64;
                    TraitScores::from_array([n / 10.0, 0.5, 0.5, 0.5, 0.5])
                })
                .collect())
        }
    }

    struct DroppingPredictor;

    impl TraitPredictor for DroppingPredictor {
        fn predict(&self, _sequences: &[EncodedSequence]) -> Result<Vec<TraitScores>> {
            Ok(vec![])
        }
    }

    fn encoder() -> SequenceEncoder {
        SequenceEncoder::fit(&["party friends dance tonight", "party"], 8).unwrap()
    }

    #[test]
    fn test_results_keep_original_text() {
        let analyzer = OceanAnalyzer::new(encoder(), LengthPredictor);
        let results = analyzer.analyze(&["Party, friends!", ""]).unwrap();
        assert_eq!(results[0].text, "Party, friends!");
        assert_eq!(results[0].scores.extraversion, 0.2);
        assert_eq!(results[1].text, "");
        assert_eq!(results[1].scores.extraversion, 0.0);
    }

    #[test]
    fn test_normalization_changes_encoded_tokens() {
        let raw = OceanAnalyzer::new(encoder(), LengthPredictor);
        let normalized = OceanAnalyzer::new(encoder(), LengthPredictor).with_normalization(true);
        // "parties" is unknown raw, but lemmatizes to the known "party".
        let text = ["parties"];
        assert_eq!(raw.analyze(&text).unwrap()[0].scores.extraversion, 0.0);
        assert_eq!(normalized.analyze(&text).unwrap()[0].scores.extraversion, 0.1);
    }

    #[test]
    fn test_empty_batch_reports_insufficient_data() {
        let analyzer = OceanAnalyzer::new(encoder(), LengthPredictor);
        let report = analyzer.report::<&str>(&[]).unwrap();
        assert!(report.results.is_empty());
        assert!(report.average.is_none());
        assert!(report.summary.is_insufficient());
        assert!(report.to_record("nobody").insights.is_empty());
    }

    #[test]
    fn test_prediction_count_mismatch_is_an_error() {
        let analyzer = OceanAnalyzer::new(encoder(), DroppingPredictor);
        assert!(matches!(analyzer.analyze(&["x"]), Err(PersonaError::ShapeMismatch { .. })));
    }
}
