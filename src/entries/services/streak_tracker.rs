// src/entries/services/streak_tracker.rs
//! Consecutive goal-hit day tracking.
//!
//! A streak stays open for 24 hours after its last update. A goal-hit entry inside
//! that window extends it, one outside starts a fresh streak at day 1. The window is
//! measured from the previous update, not from calendar-day boundaries.

use chrono::{DateTime, Duration, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::common::generate_streak_id;
use crate::common::helpers::format_timestamp;
use crate::entries::models::Streak;

/// Hours a streak stays open after its last update
pub const STREAK_LOOKBACK_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// No open streak; a new one starts at day 1
    Started,
    /// A different entry extended the open streak by one day
    Continued,
    /// The entry already anchors the open streak
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct StreakUpdate {
    pub streak: Streak,
    pub change: StreakChange,
}

impl StreakUpdate {
    /// True when this call created or extended a streak
    pub fn advanced(&self) -> bool {
        self.change != StreakChange::Unchanged
    }
}

pub struct StreakTracker;

impl StreakTracker {
    /// Most recently updated streak whose last update falls inside the lookback window
    pub async fn open_streak(
        conn: &mut SqliteConnection,
        user_id: &str,
        reference: DateTime<Utc>,
    ) -> Result<Option<Streak>, sqlx::Error> {
        let window_start = reference - Duration::hours(STREAK_LOOKBACK_HOURS);

        sqlx::query_as::<_, Streak>(
            "SELECT * FROM streaks WHERE user_id = ? AND updated_at >= ? ORDER BY updated_at DESC, created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(format_timestamp(&window_start))
        .fetch_optional(&mut *conn)
        .await
    }

    /// Apply a goal-hit for `entry_id` to the user's streak.
    ///
    /// Must run inside the caller's transaction; re-processing the entry that already
    /// anchors the open streak changes nothing.
    pub async fn record_goal_hit(
        conn: &mut SqliteConnection,
        user_id: &str,
        entry_id: &str,
        reference: DateTime<Utc>,
    ) -> Result<StreakUpdate, sqlx::Error> {
        let now = format_timestamp(&reference);

        let update = match Self::open_streak(&mut *conn, user_id, reference).await? {
            None => {
                let streak = Streak {
                    id: generate_streak_id(),
                    user_id: user_id.to_string(),
                    day_count: 1,
                    last_entry_id: entry_id.to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };

                sqlx::query(
                    "INSERT INTO streaks (id, user_id, day_count, last_entry_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&streak.id)
                .bind(&streak.user_id)
                .bind(streak.day_count)
                .bind(&streak.last_entry_id)
                .bind(&streak.created_at)
                .bind(&streak.updated_at)
                .execute(&mut *conn)
                .await?;

                StreakUpdate {
                    streak,
                    change: StreakChange::Started,
                }
            }
            Some(streak) if streak.last_entry_id == entry_id => StreakUpdate {
                streak,
                change: StreakChange::Unchanged,
            },
            Some(mut streak) => {
                sqlx::query(
                    "UPDATE streaks SET day_count = day_count + 1, last_entry_id = ?, updated_at = ? WHERE id = ? AND user_id = ?",
                )
                .bind(entry_id)
                .bind(&now)
                .bind(&streak.id)
                .bind(user_id)
                .execute(&mut *conn)
                .await?;

                streak.day_count += 1;
                streak.last_entry_id = entry_id.to_string();
                streak.updated_at = now;

                StreakUpdate {
                    streak,
                    change: StreakChange::Continued,
                }
            }
        };

        match update.change {
            StreakChange::Unchanged => debug!(
                user_id = %user_id,
                entry_id = %entry_id,
                day_count = update.streak.day_count,
                "Entry already counted toward streak"
            ),
            change => info!(
                user_id = %user_id,
                entry_id = %entry_id,
                streak_id = %update.streak.id,
                day_count = update.streak.day_count,
                change = ?change,
                "Streak updated"
            ),
        }

        Ok(update)
    }

    /// Most recently updated streak for the user, open or not
    pub async fn latest_streak(
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Option<Streak>, sqlx::Error> {
        sqlx::query_as::<_, Streak>(
            "SELECT * FROM streaks WHERE user_id = ? ORDER BY updated_at DESC, created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
