//! Paired Model + Vocabulary Artifacts
//!
//! An artifact directory holds three files:
//! - `model.safetensors`: network weights
//! - `vocabulary.json`: ordered token list
//! - `manifest.json`: format version, network shape (including `max_length`),
//!   output width and SHA-256 digests of the other two files
//!
//! Saving writes into a staging directory and renames it into place, so the
//! pair always moves together. Loading verifies the digests and shapes and
//! yields both halves or nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{PersonaError, Result};
use crate::model::network::{NetworkShape, TraitRegressionModel};
use crate::model::TraitPredictor;
use crate::text::{EncodedSequence, SequenceEncoder, Vocabulary};
use crate::traits::{TraitScores, TRAIT_COUNT};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

const MANIFEST_FILE: &str = "manifest.json";
const WEIGHTS_FILE: &str = "model.safetensors";
const VOCABULARY_FILE: &str = "vocabulary.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format_version: u32,
    pub shape: NetworkShape,
    pub output_dim: usize,
    pub weights_sha256: String,
    pub vocabulary_sha256: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable vocabulary + weights + `max_length`, shared read-only by
/// inference once built or loaded.
#[derive(Debug)]
pub struct ArtifactBundle {
    encoder: SequenceEncoder,
    model: TraitRegressionModel,
}

impl ArtifactBundle {
    /// Pair an encoder with a model; their vocabulary size and `max_length`
    /// must agree.
    pub fn new(encoder: SequenceEncoder, model: TraitRegressionModel) -> Result<Self> {
        let shape = model.shape();
        if encoder.vocabulary().table_size() != shape.vocab_size {
            return Err(PersonaError::shape(
                format!("vocabulary table size {}", shape.vocab_size),
                format!("vocabulary table size {}", encoder.vocabulary().table_size()),
            ));
        }
        if encoder.max_length() != shape.max_length {
            return Err(PersonaError::shape(
                format!("max_length {}", shape.max_length),
                format!("max_length {}", encoder.max_length()),
            ));
        }
        Ok(Self { encoder, model })
    }

    pub fn encoder(&self) -> &SequenceEncoder {
        &self.encoder
    }

    pub fn model(&self) -> &TraitRegressionModel {
        &self.model
    }

    pub fn max_length(&self) -> usize {
        self.encoder.max_length()
    }

    /// True when all three artifact files are present.
    pub fn exists(dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        [MANIFEST_FILE, WEIGHTS_FILE, VOCABULARY_FILE]
            .iter()
            .all(|f| dir.join(f).is_file())
    }

    /// Encode and predict raw texts.
    pub fn predict_texts<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<TraitScores>> {
        let sequences = self.encoder.encode(texts);
        self.model.predict(&sequences)
    }

    /// Persist the pair, replacing any previous pair at `dir`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let staging = sibling(dir, "staging");
        fs::create_dir_all(&staging)?;

        let result = self.write_files(&staging).and_then(|_| swap_into_place(&staging, dir));
        if result.is_err() && staging.exists() {
            let _ = fs::remove_dir_all(&staging);
        }
        result?;

        info!("Saved trait model artifacts to {:?}", dir);
        Ok(())
    }

    fn write_files(&self, staging: &Path) -> Result<()> {
        let weights_path = staging.join(WEIGHTS_FILE);
        self.model.save_weights(&weights_path)?;

        let vocab_json = serde_json::to_vec(self.encoder.vocabulary().as_ref())?;
        fs::write(staging.join(VOCABULARY_FILE), &vocab_json)?;

        let manifest = ArtifactManifest {
            format_version: ARTIFACT_FORMAT_VERSION,
            shape: self.model.shape().clone(),
            output_dim: TRAIT_COUNT,
            weights_sha256: sha256_hex(&fs::read(&weights_path)?),
            vocabulary_sha256: sha256_hex(&vocab_json),
            created_at: Utc::now(),
        };
        // Written last: a directory without a manifest is never loadable.
        fs::write(staging.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?)?;
        Ok(())
    }

    /// Restore both halves or fail with the reason.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        for file in [MANIFEST_FILE, WEIGHTS_FILE, VOCABULARY_FILE] {
            if !dir.join(file).is_file() {
                return Err(PersonaError::Artifact(format!("missing {} in {:?}", file, dir)));
            }
        }

        let manifest: ArtifactManifest = serde_json::from_slice(&fs::read(dir.join(MANIFEST_FILE))?)?;
        if manifest.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(PersonaError::ArtifactVersion {
                found: manifest.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        if manifest.output_dim != TRAIT_COUNT {
            return Err(PersonaError::shape(
                format!("{} outputs", TRAIT_COUNT),
                format!("{} outputs", manifest.output_dim),
            ));
        }

        let vocab_bytes = fs::read(dir.join(VOCABULARY_FILE))?;
        verify_digest(VOCABULARY_FILE, &vocab_bytes, &manifest.vocabulary_sha256)?;
        let weights_bytes = fs::read(dir.join(WEIGHTS_FILE))?;
        verify_digest(WEIGHTS_FILE, &weights_bytes, &manifest.weights_sha256)?;

        let vocabulary: Vocabulary = serde_json::from_slice(&vocab_bytes)?;
        if vocabulary.table_size() != manifest.shape.vocab_size {
            return Err(PersonaError::shape(
                format!("vocabulary table size {}", manifest.shape.vocab_size),
                format!("vocabulary table size {}", vocabulary.table_size()),
            ));
        }
        let encoder = SequenceEncoder::new(Arc::new(vocabulary), manifest.shape.max_length)?;

        // The manifest is not digested; its widths must agree with the verified
        // weights before any variable is allocated.
        let device = candle_core::Device::Cpu;
        let tensors = candle_core::safetensors::load_buffer(&weights_bytes, &device)?;
        manifest.shape.check_tensors(&tensors)?;

        let mut model = TraitRegressionModel::new(manifest.shape.clone(), device)?;
        model.assign_weights(&tensors)?;

        debug!(
            "Loaded artifacts: vocab {}, max_length {}",
            manifest.shape.vocab_size, manifest.shape.max_length
        );
        Self::new(encoder, model)
    }

    /// [`ArtifactBundle::load`] with the error logged and discarded.
    pub fn try_load(dir: impl AsRef<Path>) -> Option<Self> {
        match Self::load(dir.as_ref()) {
            Ok(bundle) => {
                info!("Trait model loaded from {:?}", dir.as_ref());
                Some(bundle)
            }
            Err(e) => {
                warn!("Could not load trait model from {:?}: {}", dir.as_ref(), e);
                None
            }
        }
    }
}

impl TraitPredictor for ArtifactBundle {
    fn predict(&self, sequences: &[EncodedSequence]) -> Result<Vec<TraitScores>> {
        self.model.predict(sequences)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn verify_digest(name: &str, bytes: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_hex(bytes);
    if actual != expected {
        return Err(PersonaError::Artifact(format!("{} is corrupt (digest mismatch)", name)));
    }
    Ok(())
}

fn sibling(dir: &Path, tag: &str) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifacts".to_string());
    let parent = dir.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!(".{}.{}-{}", name, tag, Uuid::new_v4()))
}

fn swap_into_place(staging: &Path, dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::rename(staging, dir)?;
        return Ok(());
    }
    let retired = sibling(dir, "old");
    fs::rename(dir, &retired)?;
    if let Err(e) = fs::rename(staging, dir) {
        // Put the previous pair back so the directory is never left empty.
        let _ = fs::rename(&retired, dir);
        return Err(e.into());
    }
    if let Err(e) = fs::remove_dir_all(&retired) {
        warn!("Could not remove retired artifacts {:?}: {}", retired, e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn tiny_bundle() -> ArtifactBundle {
        let encoder = SequenceEncoder::fit(&["happy people love parties", "quiet books"], 5).unwrap();
        let shape = NetworkShape {
            vocab_size: encoder.vocabulary().table_size(),
            max_length: 5,
            embedding_dim: 3,
            lstm_units: 4,
            dense_units: 2,
        };
        let model = TraitRegressionModel::new(shape, Device::Cpu).unwrap();
        ArtifactBundle::new(encoder, model).unwrap()
    }

    #[test]
    fn test_save_then_load_preserves_predictions() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("model");
        let bundle = tiny_bundle();
        bundle.save(&dir).unwrap();
        assert!(ArtifactBundle::exists(&dir));

        let loaded = ArtifactBundle::load(&dir).unwrap();
        assert_eq!(loaded.max_length(), 5);
        assert_eq!(loaded.encoder().vocabulary(), bundle.encoder().vocabulary());

        let texts = ["happy parties", "quiet"];
        let a = bundle.predict_texts(&texts).unwrap();
        let b = loaded.predict_texts(&texts).unwrap();
        for (x, y) in a.iter().zip(&b) {
            for (p, q) in x.to_array().iter().zip(y.to_array()) {
                assert!((p - q).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_missing_half_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("model");
        tiny_bundle().save(&dir).unwrap();
        fs::remove_file(dir.join(VOCABULARY_FILE)).unwrap();

        assert!(!ArtifactBundle::exists(&dir));
        assert!(matches!(ArtifactBundle::load(&dir), Err(PersonaError::Artifact(_))));
        assert!(ArtifactBundle::try_load(&dir).is_none());
    }

    #[test]
    fn test_corrupt_weights_detected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("model");
        tiny_bundle().save(&dir).unwrap();
        fs::write(dir.join(WEIGHTS_FILE), b"not a tensor file").unwrap();
        assert!(ArtifactBundle::try_load(&dir).is_none());
    }

    #[test]
    fn test_version_mismatch_detected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("model");
        tiny_bundle().save(&dir).unwrap();

        let path = dir.join(MANIFEST_FILE);
        let mut manifest: ArtifactManifest = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        manifest.format_version = 99;
        fs::write(&path, serde_json::to_vec(&manifest).unwrap()).unwrap();

        assert!(matches!(
            ArtifactBundle::load(&dir),
            Err(PersonaError::ArtifactVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_tampered_manifest_width_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("model");
        tiny_bundle().save(&dir).unwrap();

        let path = dir.join(MANIFEST_FILE);
        let mut manifest: ArtifactManifest = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        manifest.shape.embedding_dim = 1 << 30;
        fs::write(&path, serde_json::to_vec(&manifest).unwrap()).unwrap();

        assert!(matches!(ArtifactBundle::load(&dir), Err(PersonaError::ShapeMismatch { .. })));
        assert!(ArtifactBundle::try_load(&dir).is_none());
    }

    #[test]
    fn test_tampered_manifest_vocab_size_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("model");
        tiny_bundle().save(&dir).unwrap();

        let path = dir.join(MANIFEST_FILE);
        let mut manifest: ArtifactManifest = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        manifest.shape.vocab_size = usize::MAX / 2;
        fs::write(&path, serde_json::to_vec(&manifest).unwrap()).unwrap();

        assert!(matches!(ArtifactBundle::load(&dir), Err(PersonaError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_save_replaces_existing_pair() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("model");
        tiny_bundle().save(&dir).unwrap();
        tiny_bundle().save(&dir).unwrap();
        assert!(ArtifactBundle::load(&dir).is_ok());
        // Only the live directory remains next to it.
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let encoder = SequenceEncoder::fit(&["a b c"], 5).unwrap();
        let shape = NetworkShape {
            vocab_size: 99,
            max_length: 5,
            embedding_dim: 2,
            lstm_units: 2,
            dense_units: 2,
        };
        let model = TraitRegressionModel::new(shape, Device::Cpu).unwrap();
        assert!(ArtifactBundle::new(encoder, model).is_err());
    }
}
