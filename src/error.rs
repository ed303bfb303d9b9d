//! Error types for the personality inference pipeline.

/// Top-level error type for training, artifact handling and inference.
#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    #[error("cannot train with zero samples")]
    EmptyCorpus,

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("training diverged at epoch {epoch} (loss is not finite)")]
    Divergence { epoch: usize },

    #[error("training cancelled after {completed_epochs} completed epochs")]
    TrainingCancelled { completed_epochs: usize },

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("artifact format version {found} is not supported (expected {expected})")]
    ArtifactVersion { found: u32, expected: u32 },

    #[error("corpus error: {0}")]
    Corpus(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),
}

impl PersonaError {
    pub(crate) fn shape(expected: impl ToString, actual: impl ToString) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PersonaError>;
