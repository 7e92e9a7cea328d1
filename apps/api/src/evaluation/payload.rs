//! Pure request normalization: recruiter-entered fields become the scoring
//! service payload. No I/O, no failure path — malformed input is rejected by
//! the pipeline's validation step before this runs.

use crate::clients::scoring::ScoringPayload;
use crate::models::request::EvaluationRequest;

/// The four primary link types (github, linkedin, portfolio, facebook) define
/// full presence; "other" links still count toward the numerator.
const MAX_EXPECTED_LINKS: f64 = 4.0;

pub const DEFAULT_JOB_TITLE: &str = "Candidate Evaluation";

pub fn build_payload(request: &EvaluationRequest) -> ScoringPayload {
    let social_profiles = request.social_profiles();
    let total_links = social_profiles.len();
    let presence_hint = ((total_links as f64) / MAX_EXPECTED_LINKS).clamp(0.0, 1.0);

    ScoringPayload {
        jd_title: job_title(request),
        jd_description: request.job_description.clone(),
        candidate_id: candidate_id(request),
        candidate_name: request.candidate_name.trim().to_string(),
        candidate_email: trimmed(&request.email),
        candidate_phone: trimmed(&request.phone),
        cv_text: request.cv_text.clone(),
        include_explanation: true,
        social_profiles,
        presence_hint,
        total_links,
    }
}

pub fn job_title(request: &EvaluationRequest) -> String {
    trimmed(&request.job_title).unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string())
}

/// Explicit id wins; otherwise derive one from the name (lowercased, spaces
/// collapsed to underscores).
fn candidate_id(request: &EvaluationRequest) -> String {
    if let Some(id) = trimmed(&request.candidate_id) {
        return id;
    }
    request
        .candidate_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
