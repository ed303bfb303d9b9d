//! Labeled Training Corpus
//!
//! Loads status texts with their five trait labels from CSV (myPersonality
//! layout: a `STATUS` column plus `sEXT`, `sNEU`, `sAGR`, `sCON`, `sOPN`) and
//! produces a seeded train/validation split.

use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::info;

use crate::error::{PersonaError, Result};
use crate::traits::{Trait, TraitScores, TRAIT_COUNT};

pub const TEXT_COLUMN: &str = "STATUS";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledCorpus {
    texts: Vec<String>,
    labels: Vec<TraitScores>,
}

impl LabeledCorpus {
    pub fn new(texts: Vec<String>, labels: Vec<TraitScores>) -> Result<Self> {
        if texts.len() != labels.len() {
            return Err(PersonaError::Corpus(format!(
                "{} texts but {} label rows",
                texts.len(),
                labels.len()
            )));
        }
        Ok(Self { texts, labels })
    }

    /// Read a CSV file. Non-UTF-8 files are decoded as Latin-1.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let content = decode(bytes);
        let corpus = Self::from_csv_str(&content)?;
        info!("Loaded {} labeled samples from {:?}", corpus.len(), path);
        Ok(corpus)
    }

    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| PersonaError::Corpus(format!("missing column '{}'", name)))
        };
        let text_col = column(TEXT_COLUMN)?;
        let mut label_cols = [0usize; TRAIT_COUNT];
        for t in Trait::ALL {
            label_cols[t.index()] = column(t.corpus_column())?;
        }

        let mut texts = Vec::new();
        let mut labels = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let line = row + 2;
            let text = record
                .get(text_col)
                .ok_or_else(|| PersonaError::Corpus(format!("row {}: missing {}", line, TEXT_COLUMN)))?;

            let mut values = [0.0f64; TRAIT_COUNT];
            for t in Trait::ALL {
                let raw = record.get(label_cols[t.index()]).unwrap_or("").trim();
                let invalid = || PersonaError::Corpus(format!("row {}: invalid {} value '{}'", line, t.corpus_column(), raw));
                let value: f64 = raw.parse().map_err(|_| invalid())?;
                // f64 parsing accepts "NaN" and "inf"; neither is a usable label.
                if !value.is_finite() {
                    return Err(invalid());
                }
                values[t.index()] = value;
            }
            texts.push(text.to_string());
            labels.push(TraitScores::from_array(values));
        }

        Self::new(texts, labels)
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn labels(&self) -> &[TraitScores] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Shuffle with `seed` and hold out `ceil(len * validation_fraction)`
    /// samples, always leaving at least one for training.
    pub fn split(&self, validation_fraction: f64, seed: u64) -> (LabeledCorpus, LabeledCorpus) {
        let n = self.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        let held_out = ((n as f64) * validation_fraction.clamp(0.0, 1.0)).ceil() as usize;
        let held_out = held_out.min(n.saturating_sub(1));
        let (validation_idx, train_idx) = order.split_at(held_out);

        (self.subset(train_idx), self.subset(validation_idx))
    }

    fn subset(&self, indices: &[usize]) -> LabeledCorpus {
        LabeledCorpus {
            texts: indices.iter().map(|&i| self.texts[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}
