use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::scoring::classifier::{ClassifierError, CompletionBackend, IntentClassifier};
use crate::scoring::domain::{
    Lead, LeadId, LeadProfile, LeadScores, Offer, OfferId, OfferSubmission,
};
use crate::scoring::repository::{LeadStore, RepositoryError};
use crate::scoring::rules::RuleScorer;
use crate::scoring::service::LeadScoringService;

pub(super) fn offer() -> Offer {
    Offer {
        id: OfferId(1),
        name: "Acme".to_string(),
        value_props: vec!["fast".to_string()],
        ideal_use_cases: vec!["sales teams".to_string()],
        created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
    }
}

pub(super) fn offer_submission() -> OfferSubmission {
    OfferSubmission {
        name: "Acme".to_string(),
        value_props: vec!["fast".to_string()],
        ideal_use_cases: vec!["sales teams".to_string()],
    }
}

pub(super) fn bio_of_len(len: usize) -> String {
    "b".repeat(len)
}

pub(super) fn lead_profile(role: &str, industry: &str) -> LeadProfile {
    LeadProfile {
        name: "Ava Patel".to_string(),
        role: role.to_string(),
        company: "FlowMetrics".to_string(),
        industry: industry.to_string(),
        location: "Mumbai".to_string(),
        linkedin_bio: bio_of_len(60),
    }
}

pub(super) fn classifier_with(backend: impl CompletionBackend + 'static) -> IntentClassifier {
    IntentClassifier::new(Arc::new(backend), Duration::from_secs(2))
}

pub(super) fn build_service(
    store: Arc<MemoryStore>,
    backend: impl CompletionBackend + 'static,
) -> LeadScoringService<MemoryStore> {
    LeadScoringService::new(store, RuleScorer::default(), classifier_with(backend))
}

pub(super) fn build_service_with(
    store: Arc<MemoryStore>,
    backend: Arc<dyn CompletionBackend>,
) -> LeadScoringService<MemoryStore> {
    let classifier = IntentClassifier::new(backend, Duration::from_secs(2));
    LeadScoringService::new(store, RuleScorer::default(), classifier)
}

/// Backend returning the same reply for every prompt.
pub(super) struct StaticBackend(pub(super) &'static str);

#[async_trait]
impl CompletionBackend for StaticBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, ClassifierError> {
        Ok(self.0.to_string())
    }

    fn model_name(&self) -> &str {
        "static"
    }
}

/// Backend failing every call with a network error.
pub(super) struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, ClassifierError> {
        Err(ClassifierError::Network("connection refused".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Backend that sleeps before replying, for timeout coverage.
pub(super) struct SlowBackend(pub(super) Duration);

#[async_trait]
impl CompletionBackend for SlowBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, ClassifierError> {
        tokio::time::sleep(self.0).await;
        Ok("High".to_string())
    }

    fn model_name(&self) -> &str {
        "slow"
    }
}

/// Backend replaying scripted replies in order and recording every prompt.
#[derive(Default)]
pub(super) struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, ClassifierError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub(super) fn new(replies: Vec<Result<&str, ClassifierError>>) -> Self {
        let replies = replies
            .into_iter()
            .map(|reply| reply.map(str::to_string))
            .collect();
        Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        self.replies
            .lock()
            .expect("reply mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(ClassifierError::EmptyResponse))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[derive(Default)]
struct StoreState {
    offers: Vec<Offer>,
    leads: Vec<Lead>,
}

/// In-memory store with optional write failure injection.
#[derive(Default)]
pub(super) struct MemoryStore {
    state: Mutex<StoreState>,
    update_calls: AtomicUsize,
    /// Number of successful updates allowed before every further update fails.
    fail_after: Option<usize>,
}

impl MemoryStore {
    pub(super) fn failing_after(successful_updates: usize) -> Self {
        Self {
            fail_after: Some(successful_updates),
            ..Self::default()
        }
    }

    pub(super) fn with_offer(self) -> Self {
        self.insert_offer(offer_submission()).expect("offer stored");
        self
    }

    pub(super) fn with_leads(self, leads: Vec<LeadProfile>) -> Self {
        self.insert_leads(leads).expect("leads stored");
        self
    }

    pub(super) fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub(super) fn leads(&self) -> Vec<Lead> {
        self.state.lock().expect("store mutex poisoned").leads.clone()
    }
}

impl LeadStore for MemoryStore {
    fn insert_offer(&self, offer: OfferSubmission) -> Result<Offer, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let id = OfferId(state.offers.len() as u64 + 1);
        let offer = Offer {
            id,
            name: offer.name,
            value_props: offer.value_props,
            ideal_use_cases: offer.ideal_use_cases,
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
                + chrono::Duration::minutes(id.0 as i64),
        };
        state.offers.push(offer.clone());
        Ok(offer)
    }

    fn latest_offer(&self) -> Result<Option<Offer>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.offers.iter().max_by_key(|offer| offer.created_at).cloned())
    }

    fn insert_leads(&self, leads: Vec<LeadProfile>) -> Result<Vec<Lead>, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let mut stored = Vec::with_capacity(leads.len());
        for profile in leads {
            let lead = Lead {
                id: LeadId(state.leads.len() as u64 + 1),
                profile,
                scores: None,
                created_at: Utc.with_ymd_and_hms(2025, 1, 16, 9, 0, 0).unwrap(),
            };
            state.leads.push(lead.clone());
            stored.push(lead);
        }
        Ok(stored)
    }

    fn all_leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        Ok(self.state.lock().expect("store mutex poisoned").leads.clone())
    }

    fn update_lead_scores(&self, id: LeadId, scores: &LeadScores) -> Result<(), RepositoryError> {
        let call = self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| call >= limit) {
            return Err(RepositoryError::Unavailable("disk full".to_string()));
        }

        let mut state = self.state.lock().expect("store mutex poisoned");
        let lead = state
            .leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        lead.scores = Some(scores.clone());
        Ok(())
    }
}

/// Store whose reads fail, for pre-run error coverage.
pub(super) struct UnavailableStore;

impl LeadStore for UnavailableStore {
    fn insert_offer(&self, _offer: OfferSubmission) -> Result<Offer, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn latest_offer(&self) -> Result<Option<Offer>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn insert_leads(&self, _leads: Vec<LeadProfile>) -> Result<Vec<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn all_leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update_lead_scores(&self, _id: LeadId, _scores: &LeadScores) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}
