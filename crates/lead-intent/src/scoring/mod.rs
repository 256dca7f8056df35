//! Lead scoring: keyword rules plus language-model intent classification.
//!
//! [`LeadScoringService::run_scoring`] pulls the latest offer and every stored lead, combines
//! the rule score with the classifier's points, and writes each lead's scores back as one
//! update.

pub mod classifier;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{
    ClassificationOutcome, ClassifierError, CompletionBackend, DisabledBackend, IntentClassifier,
    IntentVerdict, OpenAiCompletionBackend,
};
pub use domain::{
    Intent, Lead, LeadId, LeadProfile, LeadScores, Offer, OfferId, OfferSubmission, ScoreResult,
    ScoringReport,
};
pub use import::{parse_leads, write_results, LeadImportError};
pub use repository::{LeadStore, RepositoryError};
pub use router::scoring_router;
pub use rules::{KeywordCategory, KeywordConfigError, KeywordSets, RuleBreakdown, RuleScorer};
pub use service::{LeadScoringService, ScoringError, ServiceError};
