use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Named keyword groups consulted by the rule scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    DecisionMaker,
    Influencer,
    IdealIndustry,
    AdjacentIndustry,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 4] = [
        KeywordCategory::DecisionMaker,
        KeywordCategory::Influencer,
        KeywordCategory::IdealIndustry,
        KeywordCategory::AdjacentIndustry,
    ];

    fn defaults(self) -> &'static [&'static str] {
        match self {
            KeywordCategory::DecisionMaker => {
                &["ceo", "cto", "vp", "director", "head", "manager"]
            }
            KeywordCategory::Influencer => &["senior", "lead", "principal", "architect"],
            KeywordCategory::IdealIndustry => &["saas", "software", "tech", "startup"],
            KeywordCategory::AdjacentIndustry => &["consulting", "marketing", "analytics"],
        }
    }
}

/// Mapping from category to keyword list. Keywords are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSets {
    categories: BTreeMap<KeywordCategory, Vec<String>>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        let categories = KeywordCategory::ALL
            .into_iter()
            .map(|category| {
                let keywords = category
                    .defaults()
                    .iter()
                    .map(|keyword| keyword.to_string())
                    .collect();
                (category, keywords)
            })
            .collect();
        Self { categories }
    }
}

impl KeywordSets {
    /// Replace one category's keywords, normalizing case and dropping blanks.
    pub fn with_category<I, S>(mut self, category: KeywordCategory, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.categories
            .insert(category, normalize(keywords.into_iter()));
        self
    }

    pub fn keywords(&self, category: KeywordCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parse a JSON object keyed by category name. Categories missing from the document keep
    /// their default lists.
    pub fn from_json(raw: &str) -> Result<Self, KeywordConfigError> {
        let overrides: BTreeMap<KeywordCategory, Vec<String>> = serde_json::from_str(raw)?;
        Ok(overrides
            .into_iter()
            .fold(Self::default(), |sets, (category, keywords)| {
                sets.with_category(category, keywords)
            }))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KeywordConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

fn normalize<S: AsRef<str>>(keywords: impl Iterator<Item = S>) -> Vec<String> {
    keywords
        .map(|keyword| keyword.as_ref().trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// Failure loading a keyword override file.
#[derive(Debug, thiserror::Error)]
pub enum KeywordConfigError {
    #[error("failed to read keyword file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid keyword file: {0}")]
    Json(#[from] serde_json::Error),
}
