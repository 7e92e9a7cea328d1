use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use tracing::debug;

use crate::models::record::{EvaluationDraft, EvaluationRecord};

/// Error raised by history store operations.
///
/// A save failure is non-fatal to the caller's evaluation result (the
/// pipeline surfaces it as a warning); failures on read/delete paths map to
/// API errors directly.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History store unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fixed-capacity, insertion-ordered log of past evaluations.
///
/// Records have exactly two states: Active (visible in `list`/`get`) and
/// Deleted (absent, via explicit delete or capacity eviction). There is no
/// update-in-place. SQLite serializes writers, and the insert+evict pair runs
/// in one transaction, so concurrent saves cannot leave count > capacity.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
    capacity: i64,
}

#[derive(FromRow)]
struct RecordRow {
    id: i64,
    timestamp: chrono::DateTime<Utc>,
    candidate_name: String,
    job_title: String,
    match_score: f64,
    recommendation: String,
    social_profiles: String,
    social_evaluation: Option<String>,
    notes: String,
}

impl RecordRow {
    fn into_record(self) -> Result<EvaluationRecord, HistoryError> {
        Ok(EvaluationRecord {
            id: self.id,
            timestamp: self.timestamp,
            candidate_name: self.candidate_name,
            job_title: self.job_title,
            match_score: self.match_score,
            recommendation: self.recommendation,
            social_profiles: serde_json::from_str(&self.social_profiles)?,
            social_evaluation: self
                .social_evaluation
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            notes: self.notes,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, timestamp, candidate_name, job_title, match_score, \
     recommendation, social_profiles, social_evaluation, notes FROM search_history";

impl HistoryStore {
    pub fn new(pool: SqlitePool, capacity: i64) -> Self {
        Self { pool, capacity }
    }

    /// Assigns id and timestamp, inserts, then evicts the oldest records
    /// beyond capacity. Oldest = earliest timestamp, ties broken by lower id.
    pub async fn save(&self, draft: EvaluationDraft) -> Result<EvaluationRecord, HistoryError> {
        let draft = draft.truncate_recommendation();
        let timestamp = Utc::now();
        let social_profiles = serde_json::to_string(&draft.social_profiles)?;
        let social_evaluation = draft
            .social_evaluation
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO search_history
                (timestamp, candidate_name, job_title, match_score, recommendation,
                 social_profiles, social_evaluation, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(timestamp)
        .bind(&draft.candidate_name)
        .bind(&draft.job_title)
        .bind(draft.match_score)
        .bind(&draft.recommendation)
        .bind(&social_profiles)
        .bind(&social_evaluation)
        .bind(&draft.notes)
        .execute(&mut *tx)
        .await?;

        let id = inserted.last_insert_rowid();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM search_history")
            .fetch_one(&mut *tx)
            .await?;

        if count > self.capacity {
            let evicted = sqlx::query(
                r#"
                DELETE FROM search_history
                WHERE id IN (
                    SELECT id FROM search_history
                    ORDER BY timestamp ASC, id ASC
                    LIMIT ?
                )
                "#,
            )
            .bind(count - self.capacity)
            .execute(&mut *tx)
            .await?;
            debug!(
                evicted = evicted.rows_affected(),
                capacity = self.capacity,
                "Evicted oldest history records"
            );
        }

        tx.commit().await?;

        Ok(EvaluationRecord {
            id,
            timestamp,
            candidate_name: draft.candidate_name,
            job_title: draft.job_title,
            match_score: draft.match_score,
            recommendation: draft.recommendation,
            social_profiles: draft.social_profiles,
            social_evaluation: draft.social_evaluation,
            notes: draft.notes,
        })
    }

    /// Recent records, most-recent first, limited to the configured capacity.
    pub async fn list(&self) -> Result<Vec<EvaluationRecord>, HistoryError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC LIMIT ?");
        let rows: Vec<RecordRow> = sqlx::query_as(&sql)
            .bind(self.capacity)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<EvaluationRecord>, HistoryError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row: Option<RecordRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(RecordRow::into_record).transpose()
    }

    /// Returns false when the id did not exist; that is not an error.
    pub async fn delete(&self, id: i64) -> Result<bool, HistoryError> {
        let result = sqlx::query("DELETE FROM search_history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes all records unconditionally.
    pub async fn purge(&self) -> Result<(), HistoryError> {
        sqlx::query("DELETE FROM search_history")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, HistoryError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM search_history")
            .fetch_one(&self.pool)
            .await?)
    }
}
