//! Training Loop
//!
//! Supervised mean-squared-error regression with an adaptive optimizer
//! (Adam, via AdamW with zero weight decay). Validation loss is reported
//! after every epoch. Cancellation is honoured at epoch boundaries only.

use candle_core::{Module, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{PersonaConfig, TrainingConfig};
use crate::corpus::LabeledCorpus;
use crate::error::{PersonaError, Result};
use crate::model::artifact::ArtifactBundle;
use crate::model::network::{NetworkShape, TraitRegressionModel};
use crate::text::{EncodedSequence, SequenceEncoder};
use crate::traits::{TraitScores, TRAIT_COUNT};

/// Encoded inputs paired with their target trait vectors.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub sequences: Vec<EncodedSequence>,
    pub targets: Vec<TraitScores>,
}

impl TrainingSet {
    pub fn new(sequences: Vec<EncodedSequence>, targets: Vec<TraitScores>) -> Result<Self> {
        if sequences.len() != targets.len() {
            return Err(PersonaError::shape(
                format!("{} targets", sequences.len()),
                format!("{} targets", targets.len()),
            ));
        }
        Ok(Self { sequences, targets })
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Metrics recorded at the end of one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub train_loss: f64,
    /// `None` when the validation set is empty
    pub validation_loss: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }
}

pub struct Trainer {
    options: TrainingConfig,
    cancel: Arc<AtomicBool>,
}

impl Trainer {
    pub fn new(options: TrainingConfig) -> Self {
        Self {
            options,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag; setting it stops training at the next epoch boundary.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Fit `model` in place. Only call on a model no reader can see yet.
    pub fn train(
        &self,
        model: &mut TraitRegressionModel,
        train: &TrainingSet,
        validation: &TrainingSet,
    ) -> Result<TrainingHistory> {
        if train.is_empty() {
            return Err(PersonaError::EmptyCorpus);
        }
        if self.options.batch_size == 0 {
            return Err(PersonaError::Config("batch_size must be positive".into()));
        }
        if self.options.epochs == 0 {
            return Err(PersonaError::Config("epochs must be positive".into()));
        }

        let params = ParamsAdamW {
            lr: self.options.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(model.varmap().all_vars(), params)?;
        let mut rng = StdRng::seed_from_u64(self.options.seed);

        let inputs = stack_ids(model, &train.sequences)?;
        let targets = targets_tensor(model, &train.targets)?;
        let n = train.len();

        info!(
            "Training trait model: {} samples, {} validation, {} epochs, batch {}",
            n,
            validation.len(),
            self.options.epochs,
            self.options.batch_size
        );

        let mut history = TrainingHistory::default();
        let mut order: Vec<usize> = (0..n).collect();

        for epoch in 1..=self.options.epochs {
            if self.cancel.load(Ordering::SeqCst) {
                warn!("Training cancelled before epoch {}", epoch);
                return Err(PersonaError::TrainingCancelled {
                    completed_epochs: epoch - 1,
                });
            }

            order.shuffle(&mut rng);
            let mut weighted_loss = 0.0f64;
            for batch in order.chunks(self.options.batch_size) {
                let idx = Tensor::from_vec(
                    batch.iter().map(|&i| i as u32).collect::<Vec<u32>>(),
                    batch.len(),
                    model.device(),
                )?;
                let xb = inputs.index_select(&idx, 0)?;
                let yb = targets.index_select(&idx, 0)?;

                let predictions = model.network().forward(&xb)?;
                let loss = candle_nn::loss::mse(&predictions, &yb)?;
                optimizer.backward_step(&loss)?;
                weighted_loss += loss.to_scalar::<f32>()? as f64 * batch.len() as f64;
            }

            let train_loss = weighted_loss / n as f64;
            if !train_loss.is_finite() {
                return Err(PersonaError::Divergence { epoch });
            }
            let validation_loss = if validation.is_empty() {
                None
            } else {
                Some(evaluate(model, validation)?)
            };

            match validation_loss {
                Some(v) => info!("Epoch {}/{}: loss {:.4}, val_loss {:.4}", epoch, self.options.epochs, train_loss, v),
                None => info!("Epoch {}/{}: loss {:.4}", epoch, self.options.epochs, train_loss),
            }
            history.epochs.push(EpochMetrics {
                epoch,
                train_loss,
                validation_loss,
            });
        }

        Ok(history)
    }

    /// Full offline flow: fit vocabulary, split, build, train, bundle.
    ///
    /// The vocabulary is fitted on the whole corpus before the split.
    pub fn train_bundle(&self, corpus: &LabeledCorpus, config: &PersonaConfig) -> Result<(ArtifactBundle, TrainingHistory)> {
        if corpus.is_empty() {
            return Err(PersonaError::EmptyCorpus);
        }
        config.validate()?;

        let encoder = SequenceEncoder::fit(corpus.texts(), config.encoder.max_length)?;
        let (train_part, validation_part) = corpus.split(config.training.validation_split, config.training.seed);
        if train_part.is_empty() {
            return Err(PersonaError::EmptyCorpus);
        }

        let train = TrainingSet::new(encoder.encode(train_part.texts()), train_part.labels().to_vec())?;
        let validation = TrainingSet::new(encoder.encode(validation_part.texts()), validation_part.labels().to_vec())?;

        let shape = NetworkShape::from_config(encoder.vocabulary().table_size(), &config.encoder, &config.model);
        let mut model = TraitRegressionModel::new(shape, candle_core::Device::Cpu)?;
        let history = self.train(&mut model, &train, &validation)?;

        let bundle = ArtifactBundle::new(encoder, model)?;
        Ok((bundle, history))
    }

    /// Run [`Trainer::train_bundle`] on the blocking pool so async callers
    /// keep serving inference meanwhile.
    pub async fn train_bundle_task(
        self: Arc<Self>,
        corpus: LabeledCorpus,
        config: PersonaConfig,
    ) -> Result<(ArtifactBundle, TrainingHistory)> {
        tokio::task::spawn_blocking(move || self.train_bundle(&corpus, &config))
            .await
            .map_err(|e| PersonaError::Task(e.to_string()))?
    }
}

fn stack_ids(model: &TraitRegressionModel, sequences: &[EncodedSequence]) -> Result<Tensor> {
    let refs: Vec<&EncodedSequence> = sequences.iter().collect();
    model.ids_tensor(&refs)
}

fn targets_tensor(model: &TraitRegressionModel, targets: &[TraitScores]) -> Result<Tensor> {
    let flat: Vec<f32> = targets
        .iter()
        .flat_map(|t| t.to_array().map(|v| v as f32))
        .collect();
    Ok(Tensor::from_vec(flat, (targets.len(), TRAIT_COUNT), model.device())?)
}

/// Mean squared error over a labeled set, computed without gradient steps.
pub fn evaluate(model: &TraitRegressionModel, set: &TrainingSet) -> Result<f64> {
    if set.is_empty() {
        return Err(PersonaError::EmptyCorpus);
    }
    let predictions = model.predict(&set.sequences)?;
    let mut total = 0.0f64;
    for (p, t) in predictions.iter().zip(&set.targets) {
        total += p
            .to_array()
            .iter()
            .zip(t.to_array())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>();
    }
    Ok(total / (set.len() * TRAIT_COUNT) as f64)
}
