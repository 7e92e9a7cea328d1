use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::clients::scoring::{MatchScorer, ScoringError};
use crate::clients::social::{SocialEvaluator, SocialQuery};
use crate::evaluation::payload::{build_payload, job_title};
use crate::evaluation::validation::{validate_request, ValidationIssue, ValidationLimits};
use crate::history::HistoryStore;
use crate::models::record::{EvaluationDraft, EvaluationRecord};
use crate::models::request::EvaluationRequest;
use crate::models::score::{
    RankedFeature, ScoreResult, BRIEF_FEATURE_LIMIT, DETAILED_FEATURE_LIMIT,
};
use crate::models::social::SocialEvaluation;

/// Portion of the CV forwarded to the social evaluation service as context.
const CV_EXCERPT_LEN: usize = 300;

/// Terminal outcome of one pipeline invocation. The three variants are
/// deliberately distinct: the UI must render "fix your input", "try again
/// later", and "done (possibly degraded)" differently.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Required-field or format checks failed. No network call was made.
    Rejected { errors: Vec<ValidationIssue> },
    /// The scoring call failed. Nothing was persisted.
    ScoringFailed { error: ScoringError },
    /// Scoring succeeded. A social evaluation failure or a history write
    /// failure degrades the report but never reaches this level.
    Completed(Box<EvaluationReport>),
}

/// The merged result of a completed evaluation. Always carries the full
/// in-memory data, even when the write-through to history failed.
#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub candidate_name: String,
    pub job_title: String,
    pub score: ScoreResult,
    /// None when the step was skipped (no profiles, or not requested).
    pub social: Option<SocialEvaluation>,
    /// The persisted record; None when the history save failed.
    pub record: Option<EvaluationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_warning: Option<String>,
}

impl EvaluationReport {
    /// Top contributing features for summary cards (top 5 by |contribution|).
    pub fn brief_features(&self) -> Vec<RankedFeature> {
        self.score.explanation.ranked_features(BRIEF_FEATURE_LIMIT)
    }

    /// Top contributing features for the detailed analysis view (top 12).
    pub fn detailed_features(&self) -> Vec<RankedFeature> {
        self.score.explanation.ranked_features(DETAILED_FEATURE_LIMIT)
    }
}

/// Sequences payload building, the scoring call, the (conditional) social
/// evaluation, and the history save for one request.
///
/// Each invocation is driven start to finish by one caller; the two network
/// calls are sequential because the social evaluation is attributed to a
/// successful score. Callers needing responsiveness run each invocation on
/// its own task rather than blocking a shared dispatcher on the social
/// evaluation's long timeout.
pub struct EvaluationPipeline {
    scorer: Arc<dyn MatchScorer>,
    social: Arc<dyn SocialEvaluator>,
    store: HistoryStore,
    limits: ValidationLimits,
}

impl EvaluationPipeline {
    pub fn new(
        scorer: Arc<dyn MatchScorer>,
        social: Arc<dyn SocialEvaluator>,
        store: HistoryStore,
        limits: ValidationLimits,
    ) -> Self {
        Self {
            scorer,
            social,
            store,
            limits,
        }
    }

    pub async fn run(&self, request: &EvaluationRequest) -> PipelineOutcome {
        // Step 1: validate. Failures short-circuit before any network call.
        let errors = validate_request(request, self.limits);
        if !errors.is_empty() {
            return PipelineOutcome::Rejected { errors };
        }

        // Step 2: score. A failure here is fatal to this evaluation.
        let payload = build_payload(request);
        let score = match self.scorer.score(&payload).await {
            Ok(score) => score,
            Err(error) => {
                warn!(kind = error.kind(), "Scoring failed: {error}");
                return PipelineOutcome::ScoringFailed { error };
            }
        };

        info!(
            candidate = %payload.candidate_name,
            match_score = score.match_score,
            "Scoring complete"
        );

        // Step 3: social evaluation, only when requested and profiles exist.
        // Its outcome (either variant) is embedded; it never aborts the run.
        let social = if request.evaluate_social && !payload.social_profiles.is_empty() {
            let outcome = self.social.evaluate(&social_query(request)).await;
            if let SocialEvaluation::Failed { error } = &outcome {
                warn!("Social evaluation failed (continuing): {error}");
            }
            Some(outcome)
        } else {
            None
        };

        // Step 4: persist. A failure is surfaced as a warning; the caller
        // still receives the full in-memory report.
        let draft = EvaluationDraft {
            candidate_name: payload.candidate_name.clone(),
            job_title: job_title(request),
            match_score: score.match_score,
            recommendation: score.recommendation.clone(),
            social_profiles: payload.social_profiles.clone(),
            social_evaluation: social.clone(),
            notes: request.notes.clone().unwrap_or_default(),
        };

        let (record, persistence_warning) = match self.store.save(draft).await {
            Ok(record) => (Some(record), None),
            Err(e) => {
                warn!("History save failed: {e}");
                (
                    None,
                    Some(format!(
                        "Evaluation completed, but saving to history failed: {e}"
                    )),
                )
            }
        };

        PipelineOutcome::Completed(Box::new(EvaluationReport {
            candidate_name: payload.candidate_name,
            job_title: job_title(request),
            score,
            social,
            record,
            persistence_warning,
        }))
    }
}

fn social_query(request: &EvaluationRequest) -> SocialQuery {
    let excerpt: String = request.cv_text.chars().take(CV_EXCERPT_LEN).collect();
    SocialQuery {
        candidate_name: request.candidate_name.trim().to_string(),
        email: provided(&request.email),
        phone: provided(&request.phone),
        github_url: provided(&request.github_url),
        linkedin_url: provided(&request.linkedin_url),
        portfolio_url: provided(&request.portfolio_url),
        facebook_url: provided(&request.facebook_url),
        other_social: provided(&request.other_social),
        cv_excerpt: if excerpt.is_empty() { None } else { Some(excerpt) },
    }
}

fn provided(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::clients::scoring::ScoringPayload;
    use crate::db::test_pool;
    use crate::models::score::{Explanation, SkillAlignment};

    enum ScorerBehavior {
        Score(f64),
        Timeout,
    }

    struct FakeScorer {
        calls: AtomicUsize,
        behavior: ScorerBehavior,
    }

    impl FakeScorer {
        fn succeeding(score: f64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                behavior: ScorerBehavior::Score(score),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                behavior: ScorerBehavior::Timeout,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MatchScorer for FakeScorer {
        async fn score(&self, _payload: &ScoringPayload) -> Result<ScoreResult, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                ScorerBehavior::Score(match_score) => Ok(ScoreResult {
                    match_score,
                    recommendation: "Proceed to interview".to_string(),
                    skill_alignment: SkillAlignment::default(),
                    explanation: Explanation::default(),
                }),
                ScorerBehavior::Timeout => Err(ScoringError::Timeout { seconds: 30 }),
            }
        }
    }

    struct FakeEvaluator {
        calls: AtomicUsize,
        outcome: SocialEvaluation,
    }

    impl FakeEvaluator {
        fn returning(outcome: SocialEvaluation) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SocialEvaluator for FakeEvaluator {
        async fn evaluate(&self, _query: &SocialQuery) -> SocialEvaluation {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    const LIMITS: ValidationLimits = ValidationLimits {
        min_cv_length: 20,
        min_jd_length: 20,
    };

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            candidate_name: "Jane Doe".to_string(),
            cv_text: "A decade of distributed systems and backend engineering work across \
                      payments, logistics, and developer tooling. Led teams of up to eight."
                .to_string(),
            job_description: "Senior backend engineer. Rust, SQL, and cloud infrastructure."
                .to_string(),
            evaluate_social: true,
            ..Default::default()
        }
    }

    async fn pipeline(
        scorer: Arc<FakeScorer>,
        social: Arc<FakeEvaluator>,
    ) -> (EvaluationPipeline, HistoryStore) {
        let store = HistoryStore::new(test_pool().await, 5);
        (
            EvaluationPipeline::new(scorer, social, store.clone(), LIMITS),
            store,
        )
    }

    #[tokio::test]
    async fn test_whitespace_name_rejected_without_network_calls() {
        let scorer = Arc::new(FakeScorer::succeeding(0.72));
        let social = Arc::new(FakeEvaluator::returning(SocialEvaluation::failed("x")));
        let (pipeline, store) = pipeline(scorer.clone(), social.clone()).await;

        let mut bad = request();
        bad.candidate_name = "   ".to_string();

        let outcome = pipeline.run(&bad).await;
        assert!(matches!(outcome, PipelineOutcome::Rejected { .. }));
        assert_eq!(scorer.call_count(), 0);
        assert_eq!(social.call_count(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_scoring_failure_persists_nothing() {
        let scorer = Arc::new(FakeScorer::failing());
        let social = Arc::new(FakeEvaluator::returning(SocialEvaluation::failed("x")));
        let (pipeline, store) = pipeline(scorer.clone(), social.clone()).await;

        let mut r = request();
        r.github_url = Some("https://github.com/jdoe".to_string());

        let outcome = pipeline.run(&r).await;
        match outcome {
            PipelineOutcome::ScoringFailed { error } => assert_eq!(error.kind(), "timeout"),
            other => panic!("expected ScoringFailed, got {other:?}"),
        }
        assert_eq!(social.call_count(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_social_failure_degrades_but_completes() {
        let scorer = Arc::new(FakeScorer::succeeding(0.72));
        let social = Arc::new(FakeEvaluator::returning(SocialEvaluation::failed(
            "Social evaluation timeout (300s exceeded)",
        )));
        let (pipeline, store) = pipeline(scorer.clone(), social.clone()).await;

        let mut r = request();
        r.github_url = Some("https://github.com/jdoe".to_string());

        let outcome = pipeline.run(&r).await;
        let report = match outcome {
            PipelineOutcome::Completed(report) => report,
            other => panic!("expected Completed, got {other:?}"),
        };

        assert_eq!(report.score.match_score, 0.72);
        assert!(matches!(
            report.social,
            Some(SocialEvaluation::Failed { .. })
        ));

        // The degraded outcome is persisted, not discarded.
        let record = report.record.expect("record persisted");
        assert!(record.social_evaluation.as_ref().unwrap().is_failed());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_social_skipped_when_no_profiles_present() {
        // Scenario: 150-char CV, 80-char JD, no links, evaluate_social = true.
        let scorer = Arc::new(FakeScorer::succeeding(0.72));
        let social = Arc::new(FakeEvaluator::returning(SocialEvaluation::failed("x")));
        let (pipeline, store) = pipeline(scorer.clone(), social.clone()).await;

        let mut r = request();
        r.cv_text = "c".repeat(150);
        r.job_description = "j".repeat(80);

        let outcome = pipeline.run(&r).await;
        let report = match outcome {
            PipelineOutcome::Completed(report) => report,
            other => panic!("expected Completed, got {other:?}"),
        };

        assert_eq!(social.call_count(), 0);
        assert!(report.social.is_none());
        let record = report.record.expect("record persisted");
        assert!(record.social_evaluation.is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_social_skipped_when_not_requested() {
        let scorer = Arc::new(FakeScorer::succeeding(0.5));
        let social = Arc::new(FakeEvaluator::returning(SocialEvaluation::failed("x")));
        let (pipeline, _store) = pipeline(scorer.clone(), social.clone()).await;

        let mut r = request();
        r.evaluate_social = false;
        r.github_url = Some("https://github.com/jdoe".to_string());

        let outcome = pipeline.run(&r).await;
        assert!(matches!(outcome, PipelineOutcome::Completed(_)));
        assert_eq!(social.call_count(), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_surfaces_warning_with_full_report() {
        let scorer = Arc::new(FakeScorer::succeeding(0.72));
        let social = Arc::new(FakeEvaluator::returning(SocialEvaluation::failed("x")));

        let pool = test_pool().await;
        pool.close().await; // store writes will now fail
        let store = HistoryStore::new(pool, 5);
        let pipeline = EvaluationPipeline::new(scorer, social, store, LIMITS);

        let outcome = pipeline.run(&request()).await;
        let report = match outcome {
            PipelineOutcome::Completed(report) => report,
            other => panic!("expected Completed, got {other:?}"),
        };

        assert!(report.record.is_none());
        assert!(report.persistence_warning.is_some());
        assert_eq!(report.score.match_score, 0.72);
    }

    #[tokio::test]
    async fn test_social_query_carries_only_provided_fields() {
        let mut r = request();
        r.github_url = Some("  https://github.com/jdoe ".to_string());
        r.email = Some(String::new());

        let query = social_query(&r);
        assert_eq!(query.github_url.as_deref(), Some("https://github.com/jdoe"));
        assert!(query.email.is_none());
        assert!(query.cv_excerpt.as_ref().unwrap().chars().count() <= CV_EXCERPT_LEN);
    }
}
