use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned identifier for an ingested lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(pub u64);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lead-{:06}", self.0)
    }
}

/// Store-assigned identifier for a product offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferId(pub u64);

/// Product description submitted by the caller; ids and timestamps are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSubmission {
    pub name: String,
    #[serde(default)]
    pub value_props: Vec<String>,
    #[serde(default)]
    pub ideal_use_cases: Vec<String>,
}

/// Persisted offer. The scoring pipeline treats it as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub name: String,
    pub value_props: Vec<String>,
    pub ideal_use_cases: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The six free-text fields describing a prospect.
///
/// Absent, `null`, or non-string JSON values deserialize to the empty string so malformed
/// uploads never fault the scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub linkedin_bio: String,
}

impl LeadProfile {
    pub(crate) fn fields(&self) -> [&str; 6] {
        [
            &self.name,
            &self.role,
            &self.company,
            &self.industry,
            &self.location,
            &self.linkedin_bio,
        ]
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.fields().iter().all(|field| field.trim().is_empty())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        _ => String::new(),
    })
}

/// Categorical buying-interest label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    High,
    Medium,
    Low,
}

impl Intent {
    pub const fn label(self) -> &'static str {
        match self {
            Intent::High => "High",
            Intent::Medium => "Medium",
            Intent::Low => "Low",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five scoring fields, always written to the store as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadScores {
    pub rule_score: u8,
    pub ai_score: u8,
    pub final_score: u8,
    pub intent: Intent,
    pub reasoning: String,
}

impl LeadScores {
    /// Combine both components; `final_score` is always their sum.
    pub fn combine(rule_score: u8, ai_score: u8, intent: Intent, reasoning: String) -> Self {
        Self {
            rule_score,
            ai_score,
            final_score: rule_score + ai_score,
            intent,
            reasoning,
        }
    }
}

/// Stored lead. `scores` stays `None` until the first scoring run writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(flatten)]
    pub profile: LeadProfile,
    pub scores: Option<LeadScores>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn ai_score(&self) -> u8 {
        self.scores.as_ref().map_or(0, |scores| scores.ai_score)
    }

    pub fn final_score(&self) -> u8 {
        self.scores.as_ref().map_or(0, |scores| scores.final_score)
    }

    /// Projection for reports; `None` while the lead is unscored.
    pub fn score_result(&self) -> Option<ScoreResult> {
        self.scores
            .as_ref()
            .map(|scores| ScoreResult::project(self.id, &self.profile, scores))
    }
}

/// Caller-facing projection of one scored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub lead_id: LeadId,
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub rule_score: u8,
    pub ai_score: u8,
    pub final_score: u8,
    pub intent: Intent,
    pub reasoning: String,
}

impl ScoreResult {
    pub(crate) fn project(id: LeadId, profile: &LeadProfile, scores: &LeadScores) -> Self {
        Self {
            lead_id: id,
            name: profile.name.clone(),
            role: profile.role.clone(),
            company: profile.company.clone(),
            industry: profile.industry.clone(),
            rule_score: scores.rule_score,
            ai_score: scores.ai_score,
            final_score: scores.final_score,
            intent: scores.intent,
            reasoning: scores.reasoning.clone(),
        }
    }
}

/// Outcome of a completed scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringReport {
    pub leads_scored: usize,
    pub results: Vec<ScoreResult>,
}
