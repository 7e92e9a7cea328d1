use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recruiter-entered evaluation request, as received from the form/API surface.
///
/// All social links are independently optional. The request is raw input:
/// normalization (trimming, empty-field omission) happens in the payload
/// builder, and validation happens in the pipeline before any network call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub candidate_name: String,
    pub cv_text: String,
    pub job_description: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub candidate_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub facebook_url: Option<String>,
    #[serde(default)]
    pub other_social: Option<String>,
    /// Opt-in flag for the social evaluation step.
    #[serde(default)]
    pub evaluate_social: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EvaluationRequest {
    /// Social-profile mapping keyed by provider name, containing only providers
    /// with a non-empty trimmed value. Absence is represented by key omission,
    /// never by an empty string.
    pub fn social_profiles(&self) -> BTreeMap<String, String> {
        let mut profiles = BTreeMap::new();
        for (provider, value) in [
            ("github", &self.github_url),
            ("linkedin", &self.linkedin_url),
            ("portfolio", &self.portfolio_url),
            ("facebook", &self.facebook_url),
            ("other", &self.other_social),
        ] {
            if let Some(url) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                profiles.insert(provider.to_string(), url.to_string());
            }
        }
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_profiles_skips_empty_and_whitespace_values() {
        let request = EvaluationRequest {
            github_url: Some("https://github.com/jdoe".to_string()),
            linkedin_url: Some("   ".to_string()),
            portfolio_url: Some(String::new()),
            ..Default::default()
        };

        let profiles = request.social_profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(
            profiles.get("github").map(String::as_str),
            Some("https://github.com/jdoe")
        );
        assert!(!profiles.contains_key("linkedin"));
        assert!(!profiles.contains_key("portfolio"));
    }

    #[test]
    fn test_social_profiles_trims_values() {
        let request = EvaluationRequest {
            linkedin_url: Some("  https://linkedin.com/in/jdoe  ".to_string()),
            ..Default::default()
        };

        let profiles = request.social_profiles();
        assert_eq!(
            profiles.get("linkedin").map(String::as_str),
            Some("https://linkedin.com/in/jdoe")
        );
    }
}
