//! PersonaInsight
//!
//! Big-Five (OCEAN) personality inference from short free-form texts:
//! - Text normalization (markup stripping, stopwords, lemmatization)
//! - Vocabulary fitting and fixed-length sequence encoding
//! - Embedding → LSTM → max-pool → dense trait regression (candle)
//! - Paired model/vocabulary artifacts with integrity checks
//! - Score aggregation and rule-based personality narratives

pub mod analysis;
pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod source;
pub mod text;
pub mod traits;

// Re-exports for convenience
pub use analysis::{OceanAnalyzer, PersonalityInterpreter, PersonalitySummary};
pub use config::PersonaConfig;
pub use error::{PersonaError, Result};
pub use model::{ArtifactBundle, ModelHandle, Trainer, TraitPredictor};
pub use traits::{Trait, TraitLevel, TraitScores};
