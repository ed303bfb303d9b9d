//! Trait Regression Model
//!
//! Network definition, training, paired artifact persistence and the
//! process-wide handle used by inference.

pub mod artifact;
pub mod handle;
pub mod network;
pub mod trainer;

pub use artifact::{ArtifactBundle, ArtifactManifest, ARTIFACT_FORMAT_VERSION};
pub use handle::ModelHandle;
pub use network::{NetworkShape, TraitNetwork, TraitRegressionModel};
pub use trainer::{EpochMetrics, Trainer, TrainingHistory, TrainingSet};

use std::sync::Arc;

use crate::error::Result;
use crate::text::EncodedSequence;
use crate::traits::TraitScores;

/// Anything that maps encoded sequences to trait scores, one per sequence.
pub trait TraitPredictor: Send + Sync {
    fn predict(&self, sequences: &[EncodedSequence]) -> Result<Vec<TraitScores>>;
}

impl TraitPredictor for TraitRegressionModel {
    fn predict(&self, sequences: &[EncodedSequence]) -> Result<Vec<TraitScores>> {
        TraitRegressionModel::predict(self, sequences)
    }
}

impl<P: TraitPredictor + ?Sized> TraitPredictor for Arc<P> {
    fn predict(&self, sequences: &[EncodedSequence]) -> Result<Vec<TraitScores>> {
        (**self).predict(sequences)
    }
}
