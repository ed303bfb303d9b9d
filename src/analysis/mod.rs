//! Personality Analysis
//!
//! Aggregation of per-text predictions and rule-based interpretation into a
//! readable narrative.

pub mod aggregator;
pub mod interpreter;
pub mod pipeline;
pub mod summary;
pub mod tables;

pub use aggregator::aggregate;
pub use interpreter::PersonalityInterpreter;
pub use pipeline::{AnalysisRecord, AnalysisReport, OceanAnalyzer, TextAnalysis};
pub use summary::{Insight, InsightKind, LifeInsights, PersonalitySummary, ProfileSummary};
