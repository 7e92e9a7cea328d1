use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::social::SocialEvaluation;

/// Request body for the social evaluation service.
///
/// PRIVACY CONTRACT: only fields the candidate explicitly supplied are
/// serialized. An absent field is omitted entirely, never sent as an empty
/// string, so the upstream service cannot distinguish "not provided" from
/// "provided empty".
#[derive(Debug, Clone, Serialize)]
pub struct SocialQuery {
    pub candidate_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_social: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_excerpt: Option<String>,
}

/// Upstream response envelope. The service wraps its evaluation in a
/// success/error envelope rather than using HTTP status codes for
/// evaluation-level failures.
#[derive(Debug, Deserialize)]
struct SocialResponseEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    evaluation: Option<SocialEvaluationBody>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SocialEvaluationBody {
    #[serde(default)]
    profiles_found: BTreeSet<String>,
    #[serde(default)]
    profiles_verified: BTreeSet<String>,
    #[serde(default)]
    social_presence_score: f64,
    #[serde(default)]
    risk_flags: Vec<String>,
    #[serde(default)]
    breakdowns: BTreeMap<String, serde_json::Value>,
}

/// The social evaluation seam.
///
/// Note the contract difference from `MatchScorer`: this is a total function.
/// Timeouts, transport errors, and upstream error envelopes all become the
/// `Failed` variant; nothing raises past this boundary.
#[async_trait]
pub trait SocialEvaluator: Send + Sync {
    async fn evaluate(&self, query: &SocialQuery) -> SocialEvaluation;
}

pub struct HttpSocialEvaluator {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpSocialEvaluator {
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
}

#[async_trait]
impl SocialEvaluator for HttpSocialEvaluator {
    async fn evaluate(&self, query: &SocialQuery) -> SocialEvaluation {
        debug!(candidate = %query.candidate_name, "Sending request to social evaluation service");

        let response = match self.client.post(&self.endpoint).json(query).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!("Social evaluation timed out after {}s", self.timeout_secs);
                return SocialEvaluation::failed(format!(
                    "Social evaluation timeout ({}s exceeded - the service may need more time for scraping)",
                    self.timeout_secs
                ));
            }
            Err(e) => {
                warn!("Social evaluation transport error: {e}");
                return SocialEvaluation::failed(format!("Social evaluation unreachable: {e}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Social evaluation service returned {status}: {body}");
            return SocialEvaluation::failed(format!(
                "Social evaluation API error: {}",
                status.as_u16()
            ));
        }

        let envelope: SocialResponseEnvelope = match response.json().await {
            Ok(e) => e,
            Err(e) => {
                return SocialEvaluation::failed(format!("Malformed social evaluation response: {e}"))
            }
        };

        match (envelope.success, envelope.evaluation) {
            (true, Some(body)) => SocialEvaluation::Completed {
                profiles_found: body.profiles_found,
                profiles_verified: body.profiles_verified,
                social_presence_score: body.social_presence_score.clamp(0.0, 1.0),
                risk_flags: body.risk_flags,
                breakdowns: body.breakdowns,
            },
            _ => SocialEvaluation::failed(
                envelope
                    .error
                    .unwrap_or_else(|| "Social evaluation service reported failure".to_string()),
            ),
        }
    }
}
