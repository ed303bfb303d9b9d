//! Text Sources
//!
//! Upstream supply of a subject's raw text samples. Scrapers and API clients
//! live outside this crate and implement [`TextSource`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// One subject-authored text sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawText {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl AsRef<str> for RawText {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// Ordered text samples for a subject.
pub trait TextSource {
    fn fetch(&mut self, subject: &str, limit: usize) -> Result<Vec<RawText>>;
}

/// Reads one sample per non-empty line of a UTF-8 file; the subject is
/// ignored.
#[derive(Debug, Clone)]
pub struct LineFileSource {
    path: PathBuf,
}

impl LineFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextSource for LineFileSource {
    fn fetch(&mut self, _subject: &str, limit: usize) -> Result<Vec<RawText>> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(limit)
            .map(RawText::new)
            .collect())
    }
}
