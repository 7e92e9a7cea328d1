use serde::{Deserialize, Serialize};

/// Feature display cap for brief views (result summary cards).
pub const BRIEF_FEATURE_LIMIT: usize = 5;
/// Feature display cap for detailed views (full report / HTML export).
pub const DETAILED_FEATURE_LIMIT: usize = 12;

/// Result returned by the match-scoring service for one evaluation.
/// Immutable after parsing; downstream code only reads from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Match score in [0, 1].
    pub match_score: f64,
    pub recommendation: String,
    #[serde(default)]
    pub skill_alignment: SkillAlignment,
    #[serde(default)]
    pub explanation: Explanation,
}

/// Skills the scoring service found present in the CV vs required by the JD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillAlignment {
    #[serde(default)]
    pub present: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

/// Interpretable feature-importance breakdown attached to a score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Explanation {
    /// (feature, signed contribution) pairs, in service order.
    #[serde(default)]
    pub top_features: Vec<FeatureContribution>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub contribution: f64,
}

/// Sign label for a ranked feature, independent of its magnitude rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionDirection {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedFeature {
    pub feature: String,
    pub contribution: f64,
    pub direction: ContributionDirection,
}

impl Explanation {
    /// Features ordered by descending absolute contribution, capped at `limit`.
    /// Zero contributions count as positive, matching the display convention.
    pub fn ranked_features(&self, limit: usize) -> Vec<RankedFeature> {
        let mut ranked: Vec<&FeatureContribution> = self.top_features.iter().collect();
        ranked.sort_by(|a, b| {
            b.contribution
                .abs()
                .partial_cmp(&a.contribution.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ranked
            .into_iter()
            .take(limit)
            .map(|f| RankedFeature {
                feature: f.feature.clone(),
                contribution: f.contribution,
                direction: if f.contribution < 0.0 {
                    ContributionDirection::Negative
                } else {
                    ContributionDirection::Positive
                },
            })
            .collect()
    }
}
