use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::record::EvaluationRecord;
use crate::models::social::SocialEvaluation;
use crate::render::render_record;

/// Values repeated within one CSV cell are joined with this delimiter.
const LIST_DELIMITER: &str = ", ";
const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Html,
    Csv,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Writes one record to `export_dir` in the requested format and returns the
/// file path. Failures (e.g. write-permission denial) are reported to the
/// caller, never swallowed.
pub fn export_record(
    record: &EvaluationRecord,
    format: ExportFormat,
    export_dir: &Path,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(export_dir)?;

    let filename = format!(
        "{}_{}.{}",
        sanitize_name(&record.candidate_name),
        record.timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    );
    let path = export_dir.join(filename);

    match format {
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(record)?;
            fs::write(&path, json)?;
        }
        ExportFormat::Html => {
            fs::write(&path, render_record(record))?;
        }
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(&path)?;
            for row in csv_rows(record) {
                writer.write_record(&row)?;
            }
            writer.flush()?;
        }
    }

    Ok(path)
}

/// Flattened tabular view: section-labeled key/value rows.
fn csv_rows(record: &EvaluationRecord) -> Vec<[String; 2]> {
    let mut rows: Vec<[String; 2]> = Vec::new();
    let mut push = |key: &str, value: String| rows.push([key.to_string(), value]);

    push("Field", "Value".to_string());

    push("=== CANDIDATE INFORMATION ===", String::new());
    push("Candidate Name", record.candidate_name.clone());
    push("Job Title", record.job_title.clone());
    push("Record ID", record.id.to_string());
    push("Evaluated At", record.timestamp.to_rfc3339());

    push("=== MATCH RESULT ===", String::new());
    push("Match Score", format!("{:.4}", record.match_score));
    push("Recommendation", record.recommendation.clone());

    push("=== SOCIAL PROFILES ===", String::new());
    if record.social_profiles.is_empty() {
        push("Profiles", "Not provided".to_string());
    } else {
        for (provider, url) in &record.social_profiles {
            push(provider, url.clone());
        }
    }

    push("=== SOCIAL EVALUATION ===", String::new());
    match &record.social_evaluation {
        None => push("Status", "Not performed".to_string()),
        Some(SocialEvaluation::Failed { error }) => {
            push("Status", "Failed".to_string());
            push("Error", error.clone());
        }
        Some(SocialEvaluation::Completed {
            profiles_found,
            profiles_verified,
            social_presence_score,
            risk_flags,
            ..
        }) => {
            push("Status", "Completed".to_string());
            push(
                "Profiles Found",
                profiles_found
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(LIST_DELIMITER),
            );
            push(
                "Profiles Verified",
                profiles_verified
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(LIST_DELIMITER),
            );
            push("Presence Score", format!("{social_presence_score:.4}"));
            push("Risk Flags", risk_flags.join(LIST_DELIMITER));
        }
    }

    if !record.notes.is_empty() {
        push("=== NOTES ===", String::new());
        push("Notes", record.notes.clone());
    }

    rows
}

/// Candidate names become filename stems: path separators and spaces are
/// replaced, length capped, empty names fall back to "result".
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_NAME_LEN)
        .collect();

    if cleaned.is_empty() {
        "result".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;

    fn record() -> EvaluationRecord {
        EvaluationRecord {
            id: 7,
            timestamp: Utc::now(),
            candidate_name: "Jane Doe".to_string(),
            job_title: "Backend Engineer".to_string(),
            match_score: 0.72,
            recommendation: "Proceed to interview".to_string(),
            social_profiles: BTreeMap::from([(
                "github".to_string(),
                "https://github.com/jdoe".to_string(),
            )]),
            social_evaluation: Some(SocialEvaluation::Completed {
                profiles_found: BTreeSet::from(["github".to_string(), "linkedin".to_string()]),
                profiles_verified: BTreeSet::from(["github".to_string()]),
                social_presence_score: 0.5,
                risk_flags: vec![],
                breakdowns: BTreeMap::new(),
            }),
            notes: "manual review done".to_string(),
        }
    }

    #[test]
    fn test_json_export_round_trips() {
        let dir = tempdir().unwrap();
        let original = record();

        let path = export_record(&original, ExportFormat::Json, dir.path()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: EvaluationRecord = serde_json::from_str(&raw).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn test_html_export_is_complete_document() {
        let dir = tempdir().unwrap();
        let path = export_record(&record(), ExportFormat::Html, dir.path()).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Jane Doe"));
    }

    #[test]
    fn test_csv_export_has_section_rows_and_joined_lists() {
        let dir = tempdir().unwrap();
        let path = export_record(&record(), ExportFormat::Csv, dir.path()).unwrap();
        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.contains("=== CANDIDATE INFORMATION ==="));
        assert!(csv.contains("=== SOCIAL EVALUATION ==="));
        assert!(csv.contains("github, linkedin"));
    }

    #[test]
    fn test_filename_sanitized_from_candidate_name() {
        let dir = tempdir().unwrap();
        let mut r = record();
        r.candidate_name = "Jane/Doe evil\\name".to_string();

        let path = export_record(&r, ExportFormat::Json, dir.path()).unwrap();
        let stem = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(stem.starts_with("Jane_Doe_evil_name_"));
    }

    #[test]
    fn test_export_to_unwritable_dir_reports_error() {
        let r = record();
        let result = export_record(
            &r,
            ExportFormat::Json,
            Path::new("/proc/nonexistent/exports"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitize_empty_name_falls_back() {
        assert_eq!(sanitize_name("   "), "result");
    }
}
