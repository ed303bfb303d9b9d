//! Personality Summary
//!
//! The rendered narrative plus its lines as typed insight records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traits::{Trait, TraitLevelProfile};

pub const INSUFFICIENT_DATA: &str = "Insufficient data to generate a personality profile.";
pub const INTRO: &str = "Based on the analyzed text, this personality profile reveals someone who:";
pub const DISCLAIMER: &str = "Note: This analysis is based on writing style and word choice patterns. \
For a complete personality assessment, professional evaluation is recommended.";

const ADDITIONAL_HEADER: &str = "Additional insights:";
const RELATIONSHIP_HEADER: &str = "In relationships, this person likely:";
const WORK_HEADER: &str = "In work environments, this person typically:";

/// Relationship and career sentences for the most extreme traits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeInsights {
    pub relationships: Vec<String>,
    pub career: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub levels: TraitLevelProfile,
    /// One description per trait, in declaration order
    pub trait_descriptions: Vec<(Trait, String)>,
    /// At most three, in rule order
    pub combination_insights: Vec<String>,
    pub life: LifeInsights,
}

/// Narrative for one subject. Built fresh on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersonalitySummary {
    Profile(ProfileSummary),
    InsufficientData,
}

/// Section an insight line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InsightKind {
    #[serde(rename = "GENERAL_INSIGHTS")]
    General,
    #[serde(rename = "ADDITIONAL_INSIGHTS")]
    Additional,
    #[serde(rename = "RELATIONSHIP_INSIGHTS")]
    Relationship,
    #[serde(rename = "WORK_INSIGHTS")]
    Work,
}

impl InsightKind {
    pub const ALL: [InsightKind; 4] = [
        InsightKind::General,
        InsightKind::Additional,
        InsightKind::Relationship,
        InsightKind::Work,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

impl PersonalitySummary {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, PersonalitySummary::InsufficientData)
    }

    pub fn profile(&self) -> Option<&ProfileSummary> {
        match self {
            PersonalitySummary::Profile(p) => Some(p),
            PersonalitySummary::InsufficientData => None,
        }
    }

    /// Every insight line, tagged with its section, in narrative order.
    pub fn insights(&self) -> Vec<Insight> {
        let Some(profile) = self.profile() else {
            return Vec::new();
        };
        let tagged = |kind: InsightKind, texts: &[String]| {
            texts
                .iter()
                .map(move |text| Insight {
                    kind,
                    text: text.clone(),
                })
                .collect::<Vec<_>>()
        };

        let general: Vec<String> = profile.trait_descriptions.iter().map(|(_, d)| d.clone()).collect();
        let mut out = tagged(InsightKind::General, &general);
        out.extend(tagged(InsightKind::Additional, &profile.combination_insights));
        out.extend(tagged(InsightKind::Relationship, &profile.life.relationships));
        out.extend(tagged(InsightKind::Work, &profile.life.career));
        out
    }

    /// One comma-joined text per non-empty section.
    pub fn grouped_insights(&self) -> Vec<Insight> {
        let insights = self.insights();
        InsightKind::ALL
            .iter()
            .filter_map(|&kind| {
                let texts: Vec<&str> = insights
                    .iter()
                    .filter(|i| i.kind == kind)
                    .map(|i| i.text.as_str())
                    .collect();
                (!texts.is_empty()).then(|| Insight {
                    kind,
                    text: texts.join(", "),
                })
            })
            .collect()
    }
}

impl fmt::Display for PersonalitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = match self {
            PersonalitySummary::InsufficientData => return f.write_str(INSUFFICIENT_DATA),
            PersonalitySummary::Profile(p) => p,
        };

        let mut lines: Vec<String> = vec![INTRO.to_string()];
        for (_, description) in &profile.trait_descriptions {
            lines.push(format!("• {}", description));
        }
        if !profile.combination_insights.is_empty() {
            lines.push(format!("\n{}", ADDITIONAL_HEADER));
            for insight in &profile.combination_insights {
                lines.push(format!("• This person {}", insight));
            }
        }
        if !profile.life.relationships.is_empty() {
            lines.push(format!("\n{}", RELATIONSHIP_HEADER));
            for insight in &profile.life.relationships {
                lines.push(format!("• {}", insight));
            }
        }
        if !profile.life.career.is_empty() {
            lines.push(format!("\n{}", WORK_HEADER));
            for insight in &profile.life.career {
                lines.push(format!("• {}", insight));
            }
        }
        lines.push(format!("\n{}", DISCLAIMER));

        f.write_str(&lines.join("\n"))
    }
}
