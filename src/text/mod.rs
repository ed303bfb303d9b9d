//! Text Processing
//!
//! Cleaning, lemmatization and vocabulary-based sequence encoding.

pub mod encoder;
pub mod lemmatizer;
pub mod normalizer;
pub mod stopwords;

pub use encoder::{tokenize, EncodedSequence, SequenceEncoder, Vocabulary, PAD_INDEX};
pub use normalizer::TextNormalizer;
