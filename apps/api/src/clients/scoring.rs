use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::score::ScoreResult;

/// Failure taxonomy for the match-scoring call. Fatal to the current
/// evaluation: nothing is persisted when scoring fails.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Scoring request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Scoring API error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("Scoring service unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed scoring response: {0}")]
    Malformed(String),
}

impl ScoringError {
    /// Stable machine-readable kind, used by the API surface so the UI can
    /// render distinct guidance per failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::Timeout { .. } => "timeout",
            ScoringError::Http { .. } => "http_error",
            ScoringError::Unreachable(_) => "unreachable",
            ScoringError::Malformed(_) => "malformed",
        }
    }
}

/// Normalized request payload for the scoring service, produced by the
/// payload builder. The social mapping only ever contains non-empty values.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringPayload {
    pub jd_title: String,
    pub jd_description: String,
    pub candidate_id: String,
    pub candidate_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_phone: Option<String>,
    pub cv_text: String,
    pub include_explanation: bool,
    pub social_profiles: BTreeMap<String, String>,
    /// Derived hint in [0, 1] for how many link types were supplied.
    /// A signal for the scorer, not ground truth.
    pub presence_hint: f64,
    pub total_links: usize,
}

/// The scorer seam. The pipeline only sees this trait; production wires in
/// `HttpMatchScorer`, tests wire in call-counting fakes.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, payload: &ScoringPayload) -> Result<ScoreResult, ScoringError>;
}

/// reqwest-backed scorer client. Single attempt, no retry: the scoring
/// service is idempotent-but-slow and retry policy belongs to the caller.
pub struct HttpMatchScorer {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpMatchScorer {
    pub fn new(endpoint: String, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            timeout_secs,
        })
    }

    fn classify_transport_error(&self, err: reqwest::Error) -> ScoringError {
        if err.is_timeout() {
            ScoringError::Timeout {
                seconds: self.timeout_secs,
            }
        } else if err.is_decode() {
            ScoringError::Malformed(err.to_string())
        } else {
            ScoringError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl MatchScorer for HttpMatchScorer {
    async fn score(&self, payload: &ScoringPayload) -> Result<ScoreResult, ScoringError> {
        debug!(
            candidate = %payload.candidate_name,
            cv_len = payload.cv_text.len(),
            jd_len = payload.jd_description.len(),
            "Sending request to scoring API"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScoringError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let result: ScoreResult = response
            .json()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        debug!(match_score = result.match_score, "Scoring call succeeded");
        Ok(result)
    }
}
