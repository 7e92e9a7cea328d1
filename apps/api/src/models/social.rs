use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Outcome of the social-profile behavioral evaluation.
///
/// This is a discriminated union on purpose: callers must branch on the
/// variant before reading success-only fields. A failed evaluation degrades
/// the record but never invalidates the match score it is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SocialEvaluation {
    Completed {
        /// Providers the upstream service located a profile for.
        profiles_found: BTreeSet<String>,
        /// Subset of `profiles_found` the service could verify as the candidate.
        profiles_verified: BTreeSet<String>,
        /// Heuristic in [0, 1] for how much verifiable presence was found.
        social_presence_score: f64,
        risk_flags: Vec<String>,
        /// Provider-specific raw breakdowns, passed through untouched.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        breakdowns: BTreeMap<String, serde_json::Value>,
    },
    Failed {
        error: String,
    },
}

impl SocialEvaluation {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
