//! Configuration
//!
//! Strongly-typed settings for encoding, model topology, training and artifact
//! storage. Values come from a YAML file and/or `PERSONA_*` environment
//! variables (a `.env` file is honoured).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PersonaError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub encoder: EncoderConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub artifacts: ArtifactConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Fixed sequence length shared by training and inference
    pub max_length: usize,
    /// Run the text normalizer before encoding
    pub normalize_input: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_length: 50,
            normalize_input: false,
        }
    }
}

/// Network widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub embedding_dim: usize,
    pub lstm_units: usize,
    pub dense_units: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 50,
            lstm_units: 64,
            dense_units: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Fraction of the corpus held out for validation
    pub validation_split: f64,
    /// Seed for the train/validation shuffle and batch order
    pub seed: u64,
    /// Labeled corpus used when no artifacts exist yet
    pub corpus_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 5,
            batch_size: 64,
            learning_rate: 0.001,
            validation_split: 0.2,
            seed: 42,
            corpus_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
        }
    }
}

impl PersonaConfig {
    /// Read a YAML file. Missing sections fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `PERSONA_CONFIG` (YAML path), then individual overrides.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var("PERSONA_CONFIG") {
            Ok(path) => {
                debug!("Loading configuration from {}", path);
                Self::load(path)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(dir) = std::env::var("PERSONA_ARTIFACT_DIR") {
            config.artifacts.dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("PERSONA_CORPUS") {
            config.training.corpus_path = Some(PathBuf::from(path));
        }
        if let Some(v) = env_parse("PERSONA_MAX_LENGTH")? {
            config.encoder.max_length = v;
        }
        if let Some(v) = env_parse("PERSONA_EPOCHS")? {
            config.training.epochs = v;
        }
        if let Some(v) = env_parse("PERSONA_BATCH_SIZE")? {
            config.training.batch_size = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.encoder.max_length == 0 {
            return Err(PersonaError::Config("encoder.max_length must be positive".into()));
        }
        if self.model.embedding_dim == 0 || self.model.lstm_units == 0 || self.model.dense_units == 0 {
            return Err(PersonaError::Config("model layer widths must be positive".into()));
        }
        if self.training.epochs == 0 {
            return Err(PersonaError::Config("training.epochs must be positive".into()));
        }
        if self.training.batch_size == 0 {
            return Err(PersonaError::Config("training.batch_size must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.training.validation_split) {
            return Err(PersonaError::Config(format!(
                "training.validation_split must be in [0, 1), got {}",
                self.training.validation_split
            )));
        }
        if !(self.training.learning_rate > 0.0) {
            return Err(PersonaError::Config("training.learning_rate must be positive".into()));
        }
        Ok(())
    }
}

fn env_parse(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PersonaError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}
