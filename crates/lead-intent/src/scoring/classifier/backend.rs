use async_trait::async_trait;
use thiserror::Error;

/// Reasons a classification attempt did not yield a usable verdict.
///
/// These never leave the classifier; they are logged and replaced by the fallback verdict.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier is not configured: {0}")]
    Disabled(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("classification timed out after {0} ms")]
    Timeout(u128),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        ClassifierError::Network(err.to_string())
    }
}

/// Text-in, text-out model call. The only guarantee relied upon is "returns text or fails".
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError>;

    fn model_name(&self) -> &str;
}

/// Backend used when no credentials are configured. Every call fails, so every lead receives
/// the fallback verdict.
#[derive(Debug, Clone)]
pub struct DisabledBackend {
    reason: String,
}

impl DisabledBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for DisabledBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, ClassifierError> {
        Err(ClassifierError::Disabled(self.reason.clone()))
    }

    fn model_name(&self) -> &str {
        "disabled"
    }
}
