use serde::Serialize;

use crate::models::request::EvaluationRequest;

/// One user-fixable problem with the submitted form. Validation failures
/// short-circuit the pipeline before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Length and format rules, taken from config so deployments can tune them.
#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    pub min_cv_length: usize,
    pub min_jd_length: usize,
}

/// Checks the whole request and reports every issue at once, so the UI can
/// annotate all offending fields in a single round trip.
pub fn validate_request(
    request: &EvaluationRequest,
    limits: ValidationLimits,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if request.candidate_name.trim().chars().count() < 2 {
        issues.push(ValidationIssue::new(
            "candidate_name",
            "Candidate name is required (at least 2 characters)",
        ));
    }

    if request.cv_text.trim().chars().count() < limits.min_cv_length {
        issues.push(ValidationIssue::new(
            "cv_text",
            format!("CV must be at least {} characters", limits.min_cv_length),
        ));
    }

    if request.job_description.trim().chars().count() < limits.min_jd_length {
        issues.push(ValidationIssue::new(
            "job_description",
            format!(
                "Job Description must be at least {} characters",
                limits.min_jd_length
            ),
        ));
    }

    // Contact fields are optional; format is only checked when present.
    if let Some(email) = non_empty(&request.email) {
        if !is_valid_email(email) {
            issues.push(ValidationIssue::new("email", "Invalid email format"));
        }
    }

    if let Some(phone) = non_empty(&request.phone) {
        if !is_valid_phone(phone) {
            issues.push(ValidationIssue::new(
                "phone",
                "Invalid phone format (must be 7+ digits)",
            ));
        }
    }

    issues
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Shape check only: local@domain.tld with a 2+ letter TLD. Deliverability is
/// not our problem.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// International format: 7+ digits once common separators are stripped.
fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    digits.len() >= 7 && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: ValidationLimits = ValidationLimits {
        min_cv_length: 20,
        min_jd_length: 20,
    };

    fn valid_request() -> EvaluationRequest {
        EvaluationRequest {
            candidate_name: "Jane Doe".to_string(),
            cv_text: "Ten years of backend engineering experience.".to_string(),
            job_description: "Senior backend engineer, Rust and SQL.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_request(&valid_request(), LIMITS).is_empty());
    }

    #[test]
    fn test_whitespace_only_name_rejected() {
        let mut request = valid_request();
        request.candidate_name = "   ".to_string();
        let issues = validate_request(&request, LIMITS);
        assert!(issues.iter().any(|i| i.field == "candidate_name"));
    }

    #[test]
    fn test_one_char_name_rejected() {
        let mut request = valid_request();
        request.candidate_name = "J".to_string();
        assert!(!validate_request(&request, LIMITS).is_empty());
    }

    #[test]
    fn test_short_cv_and_jd_both_reported() {
        let mut request = valid_request();
        request.cv_text = "too short".to_string();
        request.job_description = "short".to_string();
        let issues = validate_request(&request, LIMITS);
        assert!(issues.iter().any(|i| i.field == "cv_text"));
        assert!(issues.iter().any(|i| i.field == "job_description"));
    }

    #[test]
    fn test_empty_contact_fields_are_allowed() {
        let mut request = valid_request();
        request.email = Some(String::new());
        request.phone = Some("  ".to_string());
        assert!(validate_request(&request, LIMITS).is_empty());
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("jane.doe+hr@example.co"));
        assert!(!is_valid_email("jane.doe"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane@example.c0m"));
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("+49 (151) 234-5678"));
        assert!(is_valid_phone("1234567"));
        assert!(!is_valid_phone("123456"));
        assert!(!is_valid_phone("call me maybe"));
    }

    #[test]
    fn test_invalid_email_reported_on_field() {
        let mut request = valid_request();
        request.email = Some("not-an-email".to_string());
        let issues = validate_request(&request, LIMITS);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "email");
    }
}
