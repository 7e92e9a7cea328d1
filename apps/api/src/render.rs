//! Presentation logic for the human-readable report.
//!
//! Pure functions over an already-fetched record: no I/O here. The export
//! surface consumes `render_record`; the pipeline itself never does.

use crate::models::record::EvaluationRecord;
use crate::models::social::SocialEvaluation;

/// Renders one evaluation record as a self-contained HTML document.
pub fn render_record(record: &EvaluationRecord) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<h1>Candidate Evaluation Report</h1>\n\
         <h2>{}</h2>\n\
         <p><strong>Job:</strong> {}</p>\n\
         <p><strong>Evaluated:</strong> {}</p>\n\
         <p><strong>Match Score:</strong> {:.3} ({:.1}%)</p>\n\
         <p><strong>Recommendation:</strong> {}</p>\n",
        escape(&record.candidate_name),
        escape(&record.job_title),
        record.timestamp.format("%Y-%m-%d %H:%M UTC"),
        record.match_score,
        record.match_score * 100.0,
        escape(&record.recommendation),
    ));

    if !record.social_profiles.is_empty() {
        body.push_str("<h3>Social Profiles</h3>\n<ul>\n");
        for (provider, url) in &record.social_profiles {
            body.push_str(&format!(
                "<li><strong>{}:</strong> {}</li>\n",
                escape(provider),
                escape(url)
            ));
        }
        body.push_str("</ul>\n");
    }

    body.push_str(&render_social_section(&record.social_evaluation));

    if !record.notes.is_empty() {
        body.push_str(&format!("<h3>Notes</h3>\n<p>{}</p>\n", escape(&record.notes)));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Evaluation Report - {}</title>\n\
         </head>\n\
         <body>\n{}</body>\n\
         </html>\n",
        escape(&record.candidate_name),
        body
    )
}

fn render_social_section(evaluation: &Option<SocialEvaluation>) -> String {
    let Some(evaluation) = evaluation else {
        return "<h3>Social Evaluation</h3>\n<p>Not performed (no profiles provided or not requested).</p>\n"
            .to_string();
    };

    match evaluation {
        SocialEvaluation::Completed {
            profiles_found,
            profiles_verified,
            social_presence_score,
            risk_flags,
            ..
        } => {
            let mut section = String::from("<h3>Social Evaluation</h3>\n<ul>\n");
            section.push_str(&format!(
                "<li><strong>Profiles found:</strong> {}</li>\n",
                escape(&join_or_none(profiles_found.iter()))
            ));
            section.push_str(&format!(
                "<li><strong>Verified:</strong> {}</li>\n",
                escape(&join_or_none(profiles_verified.iter()))
            ));
            section.push_str(&format!(
                "<li><strong>Presence score:</strong> {:.2}/1.0</li>\n",
                social_presence_score
            ));
            if !risk_flags.is_empty() {
                section.push_str(&format!(
                    "<li><strong>Risk flags:</strong> {}</li>\n",
                    escape(&risk_flags.join(", "))
                ));
            }
            section.push_str("</ul>\n");
            section
        }
        SocialEvaluation::Failed { error } => format!(
            "<h3>Social Evaluation</h3>\n<p><em>Check failed: {}</em></p>\n",
            escape(error)
        ),
    }
}

fn join_or_none<'a>(mut items: impl Iterator<Item = &'a String>) -> String {
    match items.next() {
        None => "none".to_string(),
        Some(first) => {
            let mut joined = first.clone();
            for item in items {
                joined.push_str(", ");
                joined.push_str(item);
            }
            joined
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
