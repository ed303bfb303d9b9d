//! Trait Regression Network
//!
//! Embedding → LSTM (full sequence) → global max-pool over time → dense ReLU →
//! linear head with one output per trait. The head is linear because trait
//! scores are continuous.

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{embedding, linear, lstm, Embedding, LSTMConfig, Linear, VarBuilder, VarMap, LSTM, RNN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::config::{EncoderConfig, ModelConfig};
use crate::error::{PersonaError, Result};
use crate::text::EncodedSequence;
use crate::traits::{TraitScores, TRAIT_COUNT};

/// Sequences per forward pass during inference.
const PREDICT_CHUNK: usize = 256;

/// Dimensions that fix the parameter shapes of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    /// Embedding rows, including the reserved padding index
    pub vocab_size: usize,
    pub max_length: usize,
    pub embedding_dim: usize,
    pub lstm_units: usize,
    pub dense_units: usize,
}

impl NetworkShape {
    pub fn from_config(vocab_size: usize, encoder: &EncoderConfig, model: &ModelConfig) -> Self {
        Self {
            vocab_size,
            max_length: encoder.max_length,
            embedding_dim: model.embedding_dim,
            lstm_units: model.lstm_units,
            dense_units: model.dense_units,
        }
    }
}

impl NetworkShape {
    /// Weight tensors whose dimensions pin down every width.
    pub fn weight_dims(&self) -> [(&'static str, [usize; 2]); 4] {
        [
            ("embedding.weight", [self.vocab_size, self.embedding_dim]),
            ("lstm.weight_ih_l0", [self.lstm_units.saturating_mul(4), self.embedding_dim]),
            ("hidden.weight", [self.dense_units, self.lstm_units]),
            ("output.weight", [TRAIT_COUNT, self.dense_units]),
        ]
    }

    /// Fail unless `tensors` has exactly these widths.
    pub fn check_tensors(&self, tensors: &HashMap<String, Tensor>) -> Result<()> {
        for (name, dims) in self.weight_dims() {
            let tensor = tensors
                .get(name)
                .ok_or_else(|| PersonaError::Artifact(format!("weights have no tensor '{}'", name)))?;
            if tensor.dims() != dims.as_slice() {
                return Err(PersonaError::shape(
                    format!("{} {:?}", name, dims),
                    format!("{} {:?}", name, tensor.dims()),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TraitNetwork {
    embedding: Embedding,
    lstm: LSTM,
    hidden: Linear,
    output: Linear,
}

impl TraitNetwork {
    pub fn new(shape: &NetworkShape, vb: VarBuilder) -> candle_core::Result<Self> {
        let embedding = embedding(shape.vocab_size, shape.embedding_dim, vb.pp("embedding"))?;
        let lstm = lstm(shape.embedding_dim, shape.lstm_units, LSTMConfig::default(), vb.pp("lstm"))?;
        let hidden = linear(shape.lstm_units, shape.dense_units, vb.pp("hidden"))?;
        let output = linear(shape.dense_units, TRAIT_COUNT, vb.pp("output"))?;
        Ok(Self {
            embedding,
            lstm,
            hidden,
            output,
        })
    }
}

impl Module for TraitNetwork {
    /// `ids`: (batch, max_length) u32 → (batch, 5) f32
    fn forward(&self, ids: &Tensor) -> candle_core::Result<Tensor> {
        let embedded = self.embedding.forward(ids)?;
        let states = self.lstm.seq(&embedded)?;
        let sequence = self.lstm.states_to_tensor(&states)?;
        let pooled = sequence.max(1)?;
        let hidden = self.hidden.forward(&pooled)?.relu()?;
        self.output.forward(&hidden)
    }
}

/// Trainable network together with the variables that back it.
pub struct TraitRegressionModel {
    network: TraitNetwork,
    varmap: VarMap,
    shape: NetworkShape,
    device: Device,
}

impl std::fmt::Debug for TraitRegressionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraitRegressionModel")
            .field("network", &self.network)
            .field("shape", &self.shape)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl TraitRegressionModel {
    /// Freshly initialised weights.
    pub fn new(shape: NetworkShape, device: Device) -> Result<Self> {
        if shape.vocab_size == 0 || shape.max_length == 0 {
            return Err(PersonaError::shape("non-empty vocabulary and max_length", format!("{:?}", shape)));
        }
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let network = TraitNetwork::new(&shape, vb)?;
        Ok(Self {
            network,
            varmap,
            shape,
            device,
        })
    }

    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub(crate) fn network(&self) -> &TraitNetwork {
        &self.network
    }

    pub(crate) fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn save_weights(&self, path: impl AsRef<Path>) -> Result<()> {
        self.varmap.save(path)?;
        Ok(())
    }

    /// Overwrite every variable from already-decoded tensors; shapes must match.
    pub fn assign_weights(&mut self, tensors: &HashMap<String, Tensor>) -> Result<()> {
        let vars = self
            .varmap
            .data()
            .lock()
            .map_err(|_| PersonaError::Artifact("weight store lock poisoned".into()))?;
        for (name, var) in vars.iter() {
            let tensor = tensors
                .get(name)
                .ok_or_else(|| PersonaError::Artifact(format!("weights have no tensor '{}'", name)))?;
            var.set(tensor)?;
        }
        Ok(())
    }

    /// Stack sequences into a (n, max_length) id tensor.
    pub(crate) fn ids_tensor(&self, sequences: &[&EncodedSequence]) -> Result<Tensor> {
        let mut flat = Vec::with_capacity(sequences.len() * self.shape.max_length);
        for seq in sequences {
            if seq.len() != self.shape.max_length {
                return Err(PersonaError::shape(
                    format!("sequence length {}", self.shape.max_length),
                    format!("sequence length {}", seq.len()),
                ));
            }
            for &id in seq.as_slice() {
                // Indices beyond the table would panic inside index_select.
                flat.push(if (id as usize) < self.shape.vocab_size { id } else { 0 });
            }
        }
        Ok(Tensor::from_vec(flat, (sequences.len(), self.shape.max_length), &self.device)?)
    }

    /// Pure forward pass; no gradient step.
    pub fn predict(&self, sequences: &[EncodedSequence]) -> Result<Vec<TraitScores>> {
        let mut scores = Vec::with_capacity(sequences.len());
        for chunk in sequences.chunks(PREDICT_CHUNK) {
            let refs: Vec<&EncodedSequence> = chunk.iter().collect();
            let ids = self.ids_tensor(&refs)?;
            let out = self.network.forward(&ids)?.to_dtype(DType::F32)?;
            for row in out.to_vec2::<f32>()? {
                if row.len() != TRAIT_COUNT {
                    return Err(PersonaError::shape(TRAIT_COUNT, row.len()));
                }
                let mut values = [0.0f64; TRAIT_COUNT];
                for (slot, v) in values.iter_mut().zip(row) {
                    *slot = v as f64;
                }
                scores.push(TraitScores::from_array(values));
            }
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_shape() -> NetworkShape {
        NetworkShape {
            vocab_size: 10,
            max_length: 6,
            embedding_dim: 4,
            lstm_units: 5,
            dense_units: 3,
        }
    }

    #[test]
    fn test_forward_emits_five_scores_per_sequence() {
        let model = TraitRegressionModel::new(tiny_shape(), Device::Cpu).unwrap();
        let seqs = vec![
            EncodedSequence::from_indices(vec![1, 2, 3], 6),
            EncodedSequence::from_indices(vec![], 6),
            EncodedSequence::from_indices(vec![9, 9, 9, 9, 9, 9, 9], 6),
        ];
        let scores = model.predict(&seqs).unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let model = TraitRegressionModel::new(tiny_shape(), Device::Cpu).unwrap();
        let seqs = vec![EncodedSequence::from_indices(vec![4, 5], 6)];
        assert_eq!(model.predict(&seqs).unwrap(), model.predict(&seqs).unwrap());
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let model = TraitRegressionModel::new(tiny_shape(), Device::Cpu).unwrap();
        let seqs = vec![EncodedSequence::from_indices(vec![1], 3)];
        assert!(matches!(model.predict(&seqs), Err(PersonaError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_weights_transfer_through_buffer() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("w.safetensors");
        let source = TraitRegressionModel::new(tiny_shape(), Device::Cpu).unwrap();
        source.save_weights(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let tensors = candle_core::safetensors::load_buffer(&bytes, &Device::Cpu).unwrap();
        tiny_shape().check_tensors(&tensors).unwrap();

        let mut target = TraitRegressionModel::new(tiny_shape(), Device::Cpu).unwrap();
        target.assign_weights(&tensors).unwrap();
        let seqs = vec![EncodedSequence::from_indices(vec![1, 2, 3], 6)];
        assert_eq!(source.predict(&seqs).unwrap(), target.predict(&seqs).unwrap());
    }

    #[test]
    fn test_widths_checked_against_tensors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("w.safetensors");
        TraitRegressionModel::new(tiny_shape(), Device::Cpu)
            .unwrap()
            .save_weights(&path)
            .unwrap();
        let tensors = candle_core::safetensors::load_buffer(&std::fs::read(&path).unwrap(), &Device::Cpu).unwrap();

        let wider = NetworkShape {
            embedding_dim: 1 << 20,
            ..tiny_shape()
        };
        assert!(matches!(wider.check_tensors(&tensors), Err(PersonaError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_empty_batch() {
        let model = TraitRegressionModel::new(tiny_shape(), Device::Cpu).unwrap();
        assert!(model.predict(&[]).unwrap().is_empty());
    }
}
