//! Language-model intent classification with a fixed fallback verdict.
//!
//! A classification attempt is an explicit [`ClassificationOutcome`]. Callers that need a
//! verdict no matter what use [`IntentClassifier::classify`], which resolves a failed attempt
//! to [`IntentVerdict::fallback`] and logs the cause.

mod backend;
mod openai;
mod prompt;

pub use backend::{ClassifierError, CompletionBackend, DisabledBackend};
pub use openai::OpenAiCompletionBackend;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Intent, LeadProfile, Offer};
use crate::config::ClassifierConfig;

pub const HIGH_POINTS: u8 = 50;
pub const MEDIUM_POINTS: u8 = 30;
pub const LOW_POINTS: u8 = 10;
pub const FALLBACK_POINTS: u8 = 25;
pub const FALLBACK_REASONING: &str = "AI unavailable, using default score";

/// Bounded AI contribution to a lead's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentVerdict {
    pub points: u8,
    pub intent: Intent,
    pub reasoning: String,
}

impl IntentVerdict {
    pub fn from_intent(intent: Intent) -> Self {
        let (points, reasoning) = match intent {
            Intent::High => (
                HIGH_POINTS,
                "AI classified lead as high buying intent based on role and profile match",
            ),
            Intent::Medium => (
                MEDIUM_POINTS,
                "AI classified lead as medium buying intent with moderate fit",
            ),
            Intent::Low => (
                LOW_POINTS,
                "AI classified lead as low buying intent with limited relevance",
            ),
        };
        Self {
            points,
            intent,
            reasoning: reasoning.to_string(),
        }
    }

    pub fn fallback() -> Self {
        Self {
            points: FALLBACK_POINTS,
            intent: Intent::Medium,
            reasoning: FALLBACK_REASONING.to_string(),
        }
    }
}

/// Result of one classification attempt.
#[derive(Debug)]
pub enum ClassificationOutcome {
    Success(IntentVerdict),
    Failed(ClassifierError),
}

impl ClassificationOutcome {
    pub fn into_verdict(self) -> IntentVerdict {
        match self {
            ClassificationOutcome::Success(verdict) => verdict,
            ClassificationOutcome::Failed(_) => IntentVerdict::fallback(),
        }
    }
}

/// Map free-form model output to an intent: "high" wins over "medium"; anything else is low.
pub fn parse_intent(reply: &str) -> Intent {
    let reply = reply.to_lowercase();
    if reply.contains("high") {
        Intent::High
    } else if reply.contains("medium") {
        Intent::Medium
    } else {
        Intent::Low
    }
}

/// Adapter around a [`CompletionBackend`] enforcing a per-call timeout.
#[derive(Clone)]
pub struct IntentClassifier {
    backend: Arc<dyn CompletionBackend>,
    timeout: Duration,
}

impl IntentClassifier {
    pub fn new(backend: Arc<dyn CompletionBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Build the configured remote classifier, or a disabled one when credentials are missing.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let backend: Arc<dyn CompletionBackend> = match OpenAiCompletionBackend::new(config) {
            Ok(backend) => Arc::new(backend),
            Err(err) => {
                warn!(error = %err, "intent classifier disabled; every lead will use the default AI score");
                Arc::new(DisabledBackend::new(err.to_string()))
            }
        };
        Self::new(backend, config.timeout)
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub async fn attempt(&self, lead: &LeadProfile, offer: &Offer) -> ClassificationOutcome {
        let prompt = prompt::build_prompt(lead, offer);
        let reply = match tokio::time::timeout(self.timeout, self.backend.complete(&prompt)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => return ClassificationOutcome::Failed(err),
            Err(_) => {
                return ClassificationOutcome::Failed(ClassifierError::Timeout(
                    self.timeout.as_millis(),
                ))
            }
        };

        if reply.trim().is_empty() {
            return ClassificationOutcome::Failed(ClassifierError::EmptyResponse);
        }

        debug!(model = self.backend.model_name(), reply = reply.trim(), "model verdict");
        ClassificationOutcome::Success(IntentVerdict::from_intent(parse_intent(&reply)))
    }

    /// Never fails: a failed attempt yields the fallback verdict.
    pub async fn classify(&self, lead: &LeadProfile, offer: &Offer) -> IntentVerdict {
        let outcome = self.attempt(lead, offer).await;
        if let ClassificationOutcome::Failed(err) = &outcome {
            warn!(lead = %lead.name, error = %err, "intent classification failed, using fallback");
        }
        outcome.into_verdict()
    }
}
