use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::social::SocialEvaluation;

/// Display cap applied to the recommendation text before persisting.
pub const RECOMMENDATION_MAX_LEN: usize = 200;

/// A persisted evaluation, as stored in (and read back from) history.
///
/// `id` and `timestamp` are assigned by the store at save time. Records are
/// never mutated after creation; they leave the store only via explicit
/// delete or capacity eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub candidate_name: String,
    pub job_title: String,
    pub match_score: f64,
    pub recommendation: String,
    pub social_profiles: BTreeMap<String, String>,
    pub social_evaluation: Option<SocialEvaluation>,
    pub notes: String,
}

/// The pipeline-produced half of a record, before the store assigns identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationDraft {
    pub candidate_name: String,
    pub job_title: String,
    pub match_score: f64,
    pub recommendation: String,
    pub social_profiles: BTreeMap<String, String>,
    pub social_evaluation: Option<SocialEvaluation>,
    pub notes: String,
}

impl EvaluationDraft {
    /// Truncates the recommendation to the display cap on a char boundary.
    pub fn truncate_recommendation(mut self) -> Self {
        if self.recommendation.chars().count() > RECOMMENDATION_MAX_LEN {
            self.recommendation = self
                .recommendation
                .chars()
                .take(RECOMMENDATION_MAX_LEN)
                .collect();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(recommendation: &str) -> EvaluationDraft {
        EvaluationDraft {
            candidate_name: "Jane Doe".to_string(),
            job_title: "Backend Engineer".to_string(),
            match_score: 0.72,
            recommendation: recommendation.to_string(),
            social_profiles: BTreeMap::new(),
            social_evaluation: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_recommendation_truncated_to_cap() {
        let long = "x".repeat(500);
        let truncated = draft(&long).truncate_recommendation();
        assert_eq!(truncated.recommendation.len(), RECOMMENDATION_MAX_LEN);
    }

    #[test]
    fn test_short_recommendation_untouched() {
        let truncated = draft("Strong hire").truncate_recommendation();
        assert_eq!(truncated.recommendation, "Strong hire");
    }
}
