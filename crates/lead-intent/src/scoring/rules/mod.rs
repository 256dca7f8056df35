mod keywords;

pub use keywords::{KeywordCategory, KeywordConfigError, KeywordSets};

use serde::{Deserialize, Serialize};

use super::domain::LeadProfile;

pub const DECISION_MAKER_POINTS: u8 = 20;
pub const INFLUENCER_POINTS: u8 = 10;
pub const IDEAL_INDUSTRY_POINTS: u8 = 20;
pub const ADJACENT_INDUSTRY_POINTS: u8 = 10;
pub const COMPLETENESS_POINTS: u8 = 10;

/// Bio must be strictly longer than this many characters to earn completeness points.
pub const MIN_BIO_CHARS: usize = 50;

/// Per-rule contributions to a rule score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBreakdown {
    pub role: u8,
    pub industry: u8,
    pub completeness: u8,
}

impl RuleBreakdown {
    pub fn total(&self) -> u8 {
        self.role + self.industry + self.completeness
    }
}

/// Stateless keyword scorer. Output is always within `0..=50`.
#[derive(Debug, Clone, Default)]
pub struct RuleScorer {
    keywords: KeywordSets,
}

impl RuleScorer {
    pub fn new(keywords: KeywordSets) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordSets {
        &self.keywords
    }

    pub fn score(&self, lead: &LeadProfile) -> u8 {
        self.breakdown(lead).total()
    }

    pub fn breakdown(&self, lead: &LeadProfile) -> RuleBreakdown {
        RuleBreakdown {
            role: self.role_points(&lead.role),
            industry: self.industry_points(&lead.industry),
            completeness: completeness_points(lead),
        }
    }

    fn role_points(&self, role: &str) -> u8 {
        let role = role.to_lowercase();
        let tokens: Vec<&str> = role.split_whitespace().collect();
        let matches = |category| {
            let keywords = self.keywords.keywords(category);
            tokens
                .iter()
                .any(|token| keywords.iter().any(|keyword| token.contains(keyword.as_str())))
        };

        if matches(KeywordCategory::DecisionMaker) {
            DECISION_MAKER_POINTS
        } else if matches(KeywordCategory::Influencer) {
            INFLUENCER_POINTS
        } else {
            0
        }
    }

    fn industry_points(&self, industry: &str) -> u8 {
        let industry = industry.to_lowercase();
        if industry.is_empty() {
            return 0;
        }
        let matches = |category| {
            self.keywords
                .keywords(category)
                .iter()
                .any(|keyword| industry.contains(keyword.as_str()))
        };

        if matches(KeywordCategory::IdealIndustry) {
            IDEAL_INDUSTRY_POINTS
        } else if matches(KeywordCategory::AdjacentIndustry) {
            ADJACENT_INDUSTRY_POINTS
        } else {
            0
        }
    }
}

fn completeness_points(lead: &LeadProfile) -> u8 {
    let all_present = lead.fields().iter().all(|field| !field.is_empty());
    if all_present && lead.linkedin_bio.chars().count() > MIN_BIO_CHARS {
        COMPLETENESS_POINTS
    } else {
        0
    }
}
