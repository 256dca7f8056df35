use std::io::Read;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::classifier::IntentClassifier;
use super::domain::{
    Lead, LeadProfile, LeadScores, Offer, OfferSubmission, ScoreResult, ScoringReport,
};
use super::import::{parse_leads, LeadImportError};
use super::repository::{LeadStore, RepositoryError};
use super::rules::RuleScorer;

/// Service composing the store, the keyword rules, and the intent classifier.
pub struct LeadScoringService<S> {
    store: Arc<S>,
    scorer: RuleScorer,
    classifier: IntentClassifier,
}

impl<S> LeadScoringService<S>
where
    S: LeadStore + 'static,
{
    pub fn new(store: Arc<S>, scorer: RuleScorer, classifier: IntentClassifier) -> Self {
        Self {
            store,
            scorer,
            classifier,
        }
    }

    /// Persist a new offer; it becomes the active offer for subsequent runs.
    pub fn save_offer(&self, submission: OfferSubmission) -> Result<Offer, ServiceError> {
        if submission.name.trim().is_empty() {
            return Err(ServiceError::InvalidOffer);
        }
        let offer = self.store.insert_offer(submission)?;
        info!(offer_id = offer.id.0, offer = %offer.name, "offer saved");
        Ok(offer)
    }

    /// Store lead profiles, skipping entirely blank entries.
    pub fn import_leads(&self, profiles: Vec<LeadProfile>) -> Result<Vec<Lead>, ServiceError> {
        let profiles: Vec<LeadProfile> = profiles
            .into_iter()
            .filter(|profile| !profile.is_blank())
            .collect();
        if profiles.is_empty() {
            return Err(LeadImportError::Empty.into());
        }

        let stored = self.store.insert_leads(profiles)?;
        info!(count = stored.len(), "leads imported");
        Ok(stored)
    }

    pub fn import_leads_csv<R: Read>(&self, reader: R) -> Result<Vec<Lead>, ServiceError> {
        let profiles = parse_leads(reader)?;
        self.import_leads(profiles)
    }

    /// Results of the most recent scoring of each lead. Unscored leads are omitted.
    pub fn results(&self) -> Result<Vec<ScoreResult>, ServiceError> {
        let leads = self.store.all_leads()?;
        Ok(leads.iter().filter_map(Lead::score_result).collect())
    }

    /// Score every stored lead against the latest offer.
    ///
    /// Leads are processed sequentially in store order. Classifier failures degrade to the
    /// fallback verdict; a persistence failure stops the run and reports partial progress.
    pub async fn run_scoring(&self) -> Result<ScoringReport, ScoringError> {
        let offer = self
            .store
            .latest_offer()
            .map_err(ScoringError::before_start)?
            .ok_or(ScoringError::NoOffer)?;
        let leads = self.store.all_leads().map_err(ScoringError::before_start)?;
        if leads.is_empty() {
            return Err(ScoringError::NoLeads);
        }

        info!(
            offer = %offer.name,
            leads = leads.len(),
            model = self.classifier.model_name(),
            "scoring run started"
        );

        let mut results = Vec::with_capacity(leads.len());
        for lead in &leads {
            let rule_score = self.scorer.score(&lead.profile);
            let verdict = self.classifier.classify(&lead.profile, &offer).await;
            let scores =
                LeadScores::combine(rule_score, verdict.points, verdict.intent, verdict.reasoning);

            if let Err(source) = self.store.update_lead_scores(lead.id, &scores) {
                error!(
                    lead_id = %lead.id,
                    scored = results.len(),
                    error = %source,
                    "persisting lead scores failed, aborting run"
                );
                return Err(ScoringError::Persistence {
                    scored: results.len(),
                    results,
                    source,
                });
            }

            debug!(
                lead_id = %lead.id,
                rule_score = scores.rule_score,
                ai_score = scores.ai_score,
                final_score = scores.final_score,
                intent = %scores.intent,
                "lead scored"
            );
            results.push(ScoreResult::project(lead.id, &lead.profile, &scores));
        }

        info!(leads_scored = results.len(), "scoring run finished");
        Ok(ScoringReport {
            leads_scored: results.len(),
            results,
        })
    }
}

/// Failure of a scoring run.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("no offer found; submit an offer before scoring")]
    NoOffer,
    #[error("no leads found; upload leads before scoring")]
    NoLeads,
    /// `results` holds the leads written before the failure; they stay updated.
    #[error("persistence failed after scoring {scored} lead(s): {source}")]
    Persistence {
        scored: usize,
        results: Vec<ScoreResult>,
        source: RepositoryError,
    },
}

impl ScoringError {
    /// Leads scored and written before a persistence failure; `None` for other errors.
    pub fn partial_report(&self) -> Option<ScoringReport> {
        match self {
            ScoringError::Persistence {
                scored, results, ..
            } => Some(ScoringReport {
                leads_scored: *scored,
                results: results.clone(),
            }),
            ScoringError::NoOffer | ScoringError::NoLeads => None,
        }
    }

    fn before_start(source: RepositoryError) -> Self {
        ScoringError::Persistence {
            scored: 0,
            results: Vec::new(),
            source,
        }
    }
}

/// Error raised by the ingestion and reporting operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("offer name must not be empty")]
    InvalidOffer,
    #[error(transparent)]
    Import(#[from] LeadImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
