//! Vocabulary and fixed-length sequence encoding
//!
//! The vocabulary ranks tokens by corpus frequency (ties keep first-seen
//! order) and assigns indices from 1; index 0 is reserved for padding and
//! out-of-vocabulary tokens.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{PersonaError, Result};

/// Characters replaced by whitespace before splitting.
const FILTER_CHARS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Index reserved for padding and unknown tokens.
pub const PAD_INDEX: u32 = 0;

/// Tokenization rule shared by `fit` and `encode`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if FILTER_CHARS.contains(c) { ' ' } else { c })
        .collect();
    lowered.split_whitespace().map(str::to_string).collect()
}

/// Token → index mapping built from a training corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    /// Tokens ordered by index; `tokens[i]` has index `i + 1`.
    tokens: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32 + 1))
            .collect();
        Self { tokens, index }
    }

    /// Build from a corpus, most frequent token first.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut order = 0usize;
        for text in corpus {
            for token in tokenize(text.as_ref()) {
                let entry = counts.entry(token).or_insert_with(|| {
                    order += 1;
                    (0, order)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        Self::from_tokens(ranked.into_iter().map(|(t, _)| t).collect())
    }

    /// Index of `token`, or [`PAD_INDEX`] when unseen.
    pub fn lookup(&self, token: &str) -> u32 {
        self.index.get(token).copied().unwrap_or(PAD_INDEX)
    }

    /// Number of known tokens (excluding the reserved index).
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Embedding table rows needed: known tokens plus the reserved index.
    pub fn table_size(&self) -> usize {
        self.tokens.len() + 1
    }

    pub fn token(&self, index: u32) -> Option<&str> {
        if index == PAD_INDEX {
            return None;
        }
        self.tokens.get(index as usize - 1).map(String::as_str)
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(tokens: Vec<String>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.tokens
    }
}

/// Exactly `max_length` token indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSequence(Vec<u32>);

impl EncodedSequence {
    /// Left-pad with zeros or drop trailing indices to reach `max_length`.
    pub fn from_indices(mut indices: Vec<u32>, max_length: usize) -> Self {
        if indices.len() >= max_length {
            indices.truncate(max_length);
            return Self(indices);
        }
        let mut padded = vec![PAD_INDEX; max_length - indices.len()];
        padded.extend(indices);
        Self(padded)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Encoder bound to one vocabulary and one sequence length.
#[derive(Debug, Clone)]
pub struct SequenceEncoder {
    vocabulary: Arc<Vocabulary>,
    max_length: usize,
}

impl SequenceEncoder {
    pub fn new(vocabulary: Arc<Vocabulary>, max_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(PersonaError::Config("max_length must be positive".into()));
        }
        Ok(Self { vocabulary, max_length })
    }

    /// Fit a vocabulary on `corpus` and bind it to `max_length`.
    pub fn fit<S: AsRef<str>>(corpus: &[S], max_length: usize) -> Result<Self> {
        Self::new(Arc::new(Vocabulary::fit(corpus)), max_length)
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn encode_one(&self, text: &str) -> EncodedSequence {
        let indices = tokenize(text).iter().map(|t| self.vocabulary.lookup(t)).collect();
        EncodedSequence::from_indices(indices, self.max_length)
    }

    /// Encode independent texts in parallel, preserving order.
    pub fn encode<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<EncodedSequence> {
        texts.par_iter().map(|t| self.encode_one(t.as_ref())).collect()
    }
}
