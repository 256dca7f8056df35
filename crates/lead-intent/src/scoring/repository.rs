use super::domain::{Lead, LeadId, LeadProfile, LeadScores, Offer, OfferSubmission};

/// Storage abstraction so the scoring service can be exercised in isolation.
///
/// `all_leads` returns leads in ingestion order; the pipeline scores them in that order.
pub trait LeadStore: Send + Sync {
    fn insert_offer(&self, offer: OfferSubmission) -> Result<Offer, RepositoryError>;
    /// Most recently created offer, if any.
    fn latest_offer(&self) -> Result<Option<Offer>, RepositoryError>;
    fn insert_leads(&self, leads: Vec<LeadProfile>) -> Result<Vec<Lead>, RepositoryError>;
    fn all_leads(&self) -> Result<Vec<Lead>, RepositoryError>;
    /// Overwrite all scoring fields of one lead in a single write.
    fn update_lead_scores(&self, id: LeadId, scores: &LeadScores) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lead {0} not found")]
    NotFound(LeadId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
