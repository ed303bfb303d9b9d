//! Text Normalizer
//!
//! Deterministic cleaning of social-media text: lowercasing, removal of URLs,
//! mentions, hashtags, digits and punctuation, stop-word filtering and
//! lemmatization.

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use tracing::warn;

use super::lemmatizer::lemmatize;
use super::stopwords::is_stop_word;

const CLEANING_PATTERN: &str = r"http\S+|www\S+|https\S+|@\w+|#\w+|\d+|[^\w\s]";

lazy_static! {
    static ref CLEANER: Result<Regex, regex::Error> = Regex::new(CLEANING_PATTERN);
}

/// Pure text cleaner. Holds no state beyond the fixed resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one text. Never fails: on an internal error the input is
    /// returned unchanged so a single bad sample cannot abort a batch.
    pub fn normalize(&self, text: &str) -> String {
        match self.try_normalize(text) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!("Text normalization failed, keeping original text: {}", e);
                text.to_string()
            }
        }
    }

    /// Normalize independent texts in parallel, preserving order.
    pub fn normalize_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<String> {
        texts.par_iter().map(|t| self.normalize(t.as_ref())).collect()
    }

    fn try_normalize(&self, text: &str) -> Result<String, &'static regex::Error> {
        let cleaner = (*CLEANER).as_ref()?;
        let lowered = text.to_lowercase();
        let cleaned = cleaner.replace_all(&lowered, " ");

        let tokens: Vec<String> = cleaned
            .split_whitespace()
            .filter(|token| !is_stop_word(token))
            .map(lemmatize)
            // A lemma can itself be a stop word; drop it so a second pass is a no-op.
            .filter(|lemma| !lemma.is_empty() && !is_stop_word(lemma))
            .collect();

        Ok(tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_social_markup() {
        let n = TextNormalizer::new();
        let out = n.normalize("Check https://example.com/x?y=1 @friend #blessed 2024 parties!!!");
        assert_eq!(out, "check party");
    }

    #[test]
    fn test_removes_stop_words_and_lemmatizes() {
        let n = TextNormalizer::new();
        assert_eq!(
            n.normalize("I always plan my day carefully and finish every task."),
            "always plan day carefully finish every task"
        );
        assert_eq!(n.normalize("The children loved the movies"), "child loved movie");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   \n\t "), "");
        assert_eq!(n.normalize("!!! ??? 123"), "");
    }

    #[test]
    fn test_idempotent() {
        let n = TextNormalizer::new();
        let samples = [
            "I love parties and talking to everyone!",
            "Sometimes I worry too much about what could go wrong in situations.",
            "Glasses, boxes & churches... www.site.org #tags @me",
            "ties dogs buses analyses news whys",
            "Indigenous peoples gather",
            "childrens datas mens geeses",
            "",
        ];
        for s in samples {
            let once = n.normalize(s);
            assert_eq!(n.normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_plural_of_irregular_form_reaches_base() {
        let n = TextNormalizer::new();
        let once = n.normalize("Indigenous peoples gather");
        assert_eq!(once, "indigenous person gather");
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn test_batch_preserves_order() {
        let n = TextNormalizer::new();
        let out = n.normalize_batch(&["Dogs bark", "", "Cats sleep"]);
        assert_eq!(out, vec!["dog bark".to_string(), String::new(), "cat sleep".to_string()]);
    }
}
