// src/stats/services.rs
//! Descriptive statistics over entries and streaks.
//!
//! Each metric is its own read-only query. Empty sums and maxima come back as zero; modal
//! buckets come back as None.

use sqlx::SqlitePool;
use tracing::debug;

use super::models::{PreferredWritingTime, Stats, StatsScope};
use crate::common::ApiError;

pub struct StatsService {
    db: SqlitePool,
}

impl StatsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Compute stats for `scope`. A caller identity is required even for global stats.
    pub async fn stats(&self, caller: &str, scope: StatsScope) -> Result<Stats, ApiError> {
        if caller.trim().is_empty() {
            return Err(ApiError::access_denied());
        }

        let user_filter = scope.user_filter();

        let (words_written, longest_entry): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(word_count), 0), COALESCE(MAX(word_count), 0)
            FROM entries
            WHERE (? IS NULL OR user_id = ?)
            "#,
        )
        .bind(user_filter)
        .bind(user_filter)
        .fetch_one(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let longest_streak: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(day_count), 0) FROM streaks WHERE (? IS NULL OR user_id = ?)",
        )
        .bind(user_filter)
        .bind(user_filter)
        .fetch_one(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let preferred_day: Option<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT CAST(strftime('%w', updated_at) AS INTEGER) AS dow, COUNT(*) AS n
            FROM entries
            WHERE (? IS NULL OR user_id = ?)
            GROUP BY dow
            ORDER BY n DESC, dow ASC
            LIMIT 1
            "#,
        )
        .bind(user_filter)
        .bind(user_filter)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let preferred_writing_times = sqlx::query_as::<_, PreferredWritingTime>(
            r#"
            SELECT CAST(strftime('%H', updated_at) AS INTEGER) AS hour, COUNT(*) AS count
            FROM entries
            WHERE (? IS NULL OR user_id = ?)
            GROUP BY hour
            ORDER BY count DESC, hour ASC
            "#,
        )
        .bind(user_filter)
        .bind(user_filter)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        debug!(scope = ?scope, words_written, longest_streak, "Stats computed");

        Ok(Stats {
            words_written,
            longest_entry,
            longest_streak,
            preferred_day_of_week: preferred_day.map(|(dow, _)| dow),
            preferred_hour_of_day: preferred_writing_times.first().map(|t| t.hour),
            preferred_writing_times,
        })
    }
}
