use chrono::Utc;
use lead_intent::config::AppConfig;
use lead_intent::error::AppError;
use lead_intent::scoring::{
    IntentClassifier, KeywordSets, Lead, LeadId, LeadProfile, LeadScores, LeadScoringService,
    LeadStore, Offer, OfferId, OfferSubmission, RepositoryError, RuleScorer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the scoring service from configuration: keyword overrides, then the classifier.
pub(crate) fn scoring_service(
    config: &AppConfig,
    store: Arc<InMemoryLeadStore>,
) -> Result<LeadScoringService<InMemoryLeadStore>, AppError> {
    let keywords = match &config.rules_path {
        Some(path) => {
            let keywords = KeywordSets::from_path(path)?;
            info!(path = %path.display(), "loaded scoring keyword overrides");
            keywords
        }
        None => KeywordSets::default(),
    };
    let classifier = IntentClassifier::from_config(&config.classifier);
    info!(model = classifier.model_name(), "intent classifier configured");

    Ok(LeadScoringService::new(
        store,
        RuleScorer::new(keywords),
        classifier,
    ))
}

#[derive(Default)]
struct StoreState {
    offers: Vec<Offer>,
    leads: Vec<Lead>,
    next_offer_id: u64,
    next_lead_id: u64,
}

/// Process-local lead store. Leads keep insertion order; ids are never reused.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryLeadStore {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("lead store mutex poisoned".to_string()))
    }
}

impl LeadStore for InMemoryLeadStore {
    fn insert_offer(&self, offer: OfferSubmission) -> Result<Offer, RepositoryError> {
        let mut guard = self.lock()?;
        guard.next_offer_id += 1;
        let offer = Offer {
            id: OfferId(guard.next_offer_id),
            name: offer.name,
            value_props: offer.value_props,
            ideal_use_cases: offer.ideal_use_cases,
            created_at: Utc::now(),
        };
        guard.offers.push(offer.clone());
        Ok(offer)
    }

    fn latest_offer(&self) -> Result<Option<Offer>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .offers
            .iter()
            .max_by_key(|offer| (offer.created_at, offer.id))
            .cloned())
    }

    fn insert_leads(&self, leads: Vec<LeadProfile>) -> Result<Vec<Lead>, RepositoryError> {
        let mut guard = self.lock()?;
        let mut stored = Vec::with_capacity(leads.len());
        for profile in leads {
            guard.next_lead_id += 1;
            let lead = Lead {
                id: LeadId(guard.next_lead_id),
                profile,
                scores: None,
                created_at: Utc::now(),
            };
            guard.leads.push(lead.clone());
            stored.push(lead);
        }
        Ok(stored)
    }

    fn all_leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        Ok(self.lock()?.leads.clone())
    }

    fn update_lead_scores(&self, id: LeadId, scores: &LeadScores) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let lead = guard
            .leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        lead.scores = Some(scores.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_intent::scoring::Intent;

    fn submission(name: &str) -> OfferSubmission {
        OfferSubmission {
            name: name.to_string(),
            value_props: Vec::new(),
            ideal_use_cases: Vec::new(),
        }
    }

    fn profile(name: &str) -> LeadProfile {
        LeadProfile {
            name: name.to_string(),
            ..LeadProfile::default()
        }
    }

    #[test]
    fn latest_offer_is_most_recent_insert() {
        let store = InMemoryLeadStore::default();
        assert!(store.latest_offer().expect("readable").is_none());

        store.insert_offer(submission("First")).expect("stored");
        let second = store.insert_offer(submission("Second")).expect("stored");

        let latest = store.latest_offer().expect("readable").expect("offer present");
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.name, "Second");
    }

    #[test]
    fn leads_keep_insertion_order_across_batches() {
        let store = InMemoryLeadStore::default();
        store
            .insert_leads(vec![profile("Ava"), profile("Ben")])
            .expect("stored");
        let later = store.insert_leads(vec![profile("Cy")]).expect("stored");

        assert_eq!(later[0].id, LeadId(3));
        let names: Vec<String> = store
            .all_leads()
            .expect("readable")
            .into_iter()
            .map(|lead| lead.profile.name)
            .collect();
        assert_eq!(names, ["Ava", "Ben", "Cy"]);
    }

    #[test]
    fn update_overwrites_scores_for_known_leads_only() {
        let store = InMemoryLeadStore::default();
        let stored = store.insert_leads(vec![profile("Ava")]).expect("stored");
        let scores = LeadScores::combine(20, 30, Intent::Medium, "moderate fit".to_string());

        store
            .update_lead_scores(stored[0].id, &scores)
            .expect("update succeeds");
        let lead = &store.all_leads().expect("readable")[0];
        assert_eq!(lead.final_score(), 50);

        assert!(matches!(
            store.update_lead_scores(LeadId(99), &scores),
            Err(RepositoryError::NotFound(LeadId(99)))
        ));
    }
}
