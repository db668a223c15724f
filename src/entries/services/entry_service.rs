// src/entries/services/entry_service.rs
//! Entry persistence and the update pipeline.
//!
//! `update_entry` runs: access check, validation, then under the user's lock a single
//! transaction that writes the entry and (on a goal hit) advances the streak. The
//! donation check happens after commit and cannot fail the request.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::common::helpers::{format_timestamp, safe_identity_log};
use crate::common::{generate_entry_id, ApiError, Validator};
use crate::entries::models::{
    CreateEntryRequest, DailyEntryQuery, EntriesQuery, Entry, UpdateEntryRequest,
};
use crate::entries::services::donation_trigger::{DonationOutcome, DonationTrigger};
use crate::entries::services::streak_tracker::{StreakTracker, StreakUpdate};
use crate::entries::services::user_locks::UserLocks;
use crate::entries::services::word_goal::WordGoalCalculator;
use crate::services::EncryptionService;

/// Result of one pass through the update pipeline
#[derive(Debug, Clone)]
pub struct EntryUpdate {
    /// Entry as stored, with plaintext content
    pub entry: Entry,
    /// Present when the entry hit its goal
    pub streak: Option<StreakUpdate>,
    /// Present when the streak advanced and a donation was considered
    pub donation: Option<DonationOutcome>,
}

pub struct EntryService {
    db: SqlitePool,
    encryption: Arc<EncryptionService>,
    donations: DonationTrigger,
    locks: UserLocks,
}

fn ensure_self(caller: &str, user_id: &str) -> Result<(), ApiError> {
    if caller != user_id {
        warn!(
            caller = %safe_identity_log(caller),
            user_id = %safe_identity_log(user_id),
            "Caller does not own the requested journal"
        );
        return Err(ApiError::access_denied());
    }
    Ok(())
}

impl EntryService {
    pub fn new(
        db: SqlitePool,
        encryption: Arc<EncryptionService>,
        donations: DonationTrigger,
    ) -> Self {
        Self {
            db,
            encryption,
            donations,
            locks: UserLocks::new(),
        }
    }

    fn seal(&self, content: &str) -> Result<String, ApiError> {
        self.encryption
            .encrypt(content)
            .map_err(|e| ApiError::InternalServer(format!("Failed to encrypt entry content: {}", e)))
    }

    fn reveal(&self, mut entry: Entry) -> Entry {
        entry.content = self.encryption.reveal(&entry.content);
        entry
    }

    // ============================================================================
    // Update pipeline
    // ============================================================================

    /// Persist an edit to an entry and apply its goal-hit side effects
    pub async fn update_entry(
        &self,
        caller: &str,
        entry_id: &str,
        request: UpdateEntryRequest,
    ) -> Result<EntryUpdate, ApiError> {
        ensure_self(caller, &request.user_id)?;
        request.validate(&request).into_result()?;

        let user_id = request.user_id.as_str();
        let reference = request.date.unwrap_or_else(Utc::now);
        let now = format_timestamp(&reference);
        let sealed = self.seal(&request.content)?;

        let guard = self.locks.lock(user_id).await;
        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        let updated = sqlx::query(
            r#"
            UPDATE entries
            SET word_count = ?, content = ?, goal_hit = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(request.word_count)
        .bind(&sealed)
        .bind(request.goal_hit)
        .bind(&now)
        .bind(entry_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, entry_id = %entry_id, "Database error updating entry");
            ApiError::DatabaseError(e)
        })?;

        if updated.rows_affected() == 0 {
            return Err(ApiError::NotFound("Entry not found".to_string()));
        }

        let streak = if request.goal_hit {
            let update = StreakTracker::record_goal_hit(&mut *tx, user_id, entry_id, reference)
                .await
                .map_err(|e| {
                    error!(error = %e, user_id = %user_id, entry_id = %entry_id, "Database error updating streak");
                    ApiError::DatabaseError(e)
                })?;
            Some(update)
        } else {
            None
        };

        let mut entry = sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = ?")
            .bind(entry_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

        tx.commit().await.map_err(|e| {
            error!(error = %e, user_id = %user_id, entry_id = %entry_id, "Failed to commit entry update");
            ApiError::DatabaseError(e)
        })?;
        drop(guard);

        entry.content = request.content;

        info!(
            user_id = %user_id,
            entry_id = %entry_id,
            word_count = entry.word_count,
            goal_hit = entry.goal_hit,
            "Entry updated"
        );

        let donation = match &streak {
            Some(update) if update.advanced() => Some(
                self.donations
                    .evaluate(user_id, entry_id, update.streak.day_count, reference)
                    .await,
            ),
            _ => None,
        };

        Ok(EntryUpdate {
            entry,
            streak,
            donation,
        })
    }

    // ============================================================================
    // Entry CRUD
    // ============================================================================

    pub async fn create_entry(
        &self,
        caller: &str,
        request: CreateEntryRequest,
    ) -> Result<Entry, ApiError> {
        ensure_self(caller, &request.user_id)?;
        request.validate(&request).into_result()?;

        let entry_id = generate_entry_id();
        let now = format_timestamp(&Utc::now());
        let sealed = self.seal(&request.content)?;

        sqlx::query(
            "INSERT INTO entries (id, user_id, word_count, content, goal_hit, created_at, updated_at) VALUES (?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&entry_id)
        .bind(&request.user_id)
        .bind(request.word_count)
        .bind(&sealed)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %request.user_id, "Database error creating entry");
            ApiError::DatabaseError(e)
        })?;

        info!(user_id = %request.user_id, entry_id = %entry_id, "Entry created");

        Ok(Entry {
            id: entry_id,
            user_id: request.user_id,
            word_count: request.word_count,
            content: request.content,
            goal_hit: false,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn find_entry(&self, entry_id: &str) -> Result<Entry, ApiError> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = ?")
            .bind(entry_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Entry not found".to_string()))
    }

    pub async fn get_entry(&self, caller: &str, entry_id: &str) -> Result<Entry, ApiError> {
        let entry = self.find_entry(entry_id).await?;
        ensure_self(caller, &entry.user_id)?;
        Ok(self.reveal(entry))
    }

    /// Entries with words in them, newest first, optionally bounded by creation time
    pub async fn list_entries(
        &self,
        caller: &str,
        query: &EntriesQuery,
    ) -> Result<Vec<Entry>, ApiError> {
        ensure_self(caller, &query.user_id)?;

        let start = query.start_date.as_ref().map(format_timestamp);
        let end = query.end_date.as_ref().map(format_timestamp);

        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE user_id = ?
              AND word_count > 0
              AND (? IS NULL OR created_at >= ?)
              AND (? IS NULL OR created_at <= ?)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&query.user_id)
        .bind(&start)
        .bind(&start)
        .bind(&end)
        .bind(&end)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(entries.into_iter().map(|e| self.reveal(e)).collect())
    }

    /// Latest entry created since `query.date`, creating an empty one if there is none
    pub async fn daily_entry(
        &self,
        caller: &str,
        query: &DailyEntryQuery,
    ) -> Result<Entry, ApiError> {
        ensure_self(caller, &query.user_id)?;

        let day_start = format_timestamp(&query.date);
        let _guard = self.locks.lock(&query.user_id).await;

        let existing = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE user_id = ? AND created_at >= ? ORDER BY created_at DESC LIMIT 1",
        )
        .bind(&query.user_id)
        .bind(&day_start)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        if let Some(entry) = existing {
            return Ok(self.reveal(entry));
        }

        let entry = Entry {
            id: generate_entry_id(),
            user_id: query.user_id.clone(),
            word_count: 0,
            content: String::new(),
            goal_hit: false,
            created_at: day_start.clone(),
            updated_at: day_start,
        };

        sqlx::query(
            "INSERT INTO entries (id, user_id, word_count, content, goal_hit, created_at, updated_at) VALUES (?, ?, 0, '', 0, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.created_at)
        .bind(&entry.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %query.user_id, "Database error creating daily entry");
            ApiError::DatabaseError(e)
        })?;

        info!(user_id = %query.user_id, entry_id = %entry.id, "Daily entry created");

        Ok(entry)
    }

    pub async fn delete_entry(&self, caller: &str, entry_id: &str) -> Result<(), ApiError> {
        let entry = self.find_entry(entry_id).await?;
        ensure_self(caller, &entry.user_id)?;

        sqlx::query("DELETE FROM entries WHERE id = ? AND user_id = ?")
            .bind(entry_id)
            .bind(&entry.user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(user_id = %entry.user_id, entry_id = %entry_id, "Entry deleted");

        Ok(())
    }

    // ============================================================================
    // Word goal
    // ============================================================================

    pub async fn word_goal(
        &self,
        caller: &str,
        user_id: &str,
        reference: DateTime<Utc>,
    ) -> Result<i64, ApiError> {
        ensure_self(caller, user_id)?;

        let inputs = WordGoalCalculator::inputs(&self.db, user_id, reference)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(inputs.adjusted_goal())
    }
}
