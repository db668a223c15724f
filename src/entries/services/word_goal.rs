// src/entries/services/word_goal.rs
//! Adaptive daily word goal.
//!
//! The user's base goal is scaled by a multiplier expressed in tenths:
//!
//! | days since last goal hit | streak      | multiplier                 |
//! |--------------------------|-------------|----------------------------|
//! | < 2                      | 1..=9       | streak / 10 (+0.1 bonus)   |
//! | < 2                      | >= 10       | 1.0                        |
//! | 1..=9                    | >= 10       | 1.0 - 0.1 * days           |
//! | anything else            |             | 0.1                        |
//!
//! The bonus applies when the latest goal-hit entry is the one anchoring the streak.
//! With no goal-hit entry on record the day count is 0, so a streak whose entries were
//! deleted still counts as recent.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::common::helpers::parse_timestamp;
use crate::entries::services::streak_tracker::StreakTracker;

const GRACE_DAYS: i64 = 2;
const MATURE_STREAK: i64 = 10;
const FLOOR_TENTHS: i64 = 1;
const FULL_TENTHS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordGoalInputs {
    pub base_goal: i64,
    /// Day count of the most recently updated streak, 0 without one
    pub streak_day_count: i64,
    /// Whole days since the latest goal-hit entry, 0 if there is none
    pub days_since_last_wrote: i64,
    pub latest_entry_anchors_streak: bool,
}

impl WordGoalInputs {
    pub fn multiplier_tenths(&self) -> i64 {
        let streak = self.streak_day_count;
        let days = self.days_since_last_wrote;
        let recent = days < GRACE_DAYS;

        if recent && streak > 0 && streak < MATURE_STREAK {
            let bonus = if self.latest_entry_anchors_streak { 1 } else { 0 };
            return streak + bonus;
        }

        if recent && streak >= MATURE_STREAK {
            return FULL_TENTHS;
        }

        if streak >= MATURE_STREAK && days > 0 && days < MATURE_STREAK {
            return FULL_TENTHS - days;
        }

        FLOOR_TENTHS
    }

    /// floor(base goal x multiplier)
    pub fn adjusted_goal(&self) -> i64 {
        self.base_goal * self.multiplier_tenths() / 10
    }
}

/// Whole 24h periods between `created_at` and `reference`, never negative
pub fn whole_days_between(created_at: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    (reference - created_at).num_days().max(0)
}

pub struct WordGoalCalculator;

impl WordGoalCalculator {
    /// Gather the inputs for `user_id` as of `reference`.
    ///
    /// Returns `Ok(None)` when the user record does not exist.
    pub async fn inputs(
        pool: &SqlitePool,
        user_id: &str,
        reference: DateTime<Utc>,
    ) -> Result<Option<WordGoalInputs>, sqlx::Error> {
        let base_goal: Option<i64> =
            sqlx::query_scalar("SELECT word_goal FROM users WHERE identity_id = ?")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        let base_goal = match base_goal {
            Some(goal) => goal,
            None => return Ok(None),
        };

        let streak = StreakTracker::latest_streak(pool, user_id).await?;

        let latest_goal_hit: Option<(String, String)> = sqlx::query_as(
            "SELECT id, created_at FROM entries WHERE user_id = ? AND goal_hit = 1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        let days_since_last_wrote = latest_goal_hit
            .as_ref()
            .and_then(|(_, created_at)| parse_timestamp(created_at))
            .map(|created_at| whole_days_between(created_at, reference))
            .unwrap_or(0);

        let latest_entry_anchors_streak = match (&streak, &latest_goal_hit) {
            (Some(streak), Some((entry_id, _))) => &streak.last_entry_id == entry_id,
            _ => false,
        };

        Ok(Some(WordGoalInputs {
            base_goal,
            streak_day_count: streak.map(|s| s.day_count).unwrap_or(0),
            days_since_last_wrote,
            latest_entry_anchors_streak,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{at, insert_entry, insert_streak, insert_user, setup_test_db};

    fn inputs(streak: i64, days: i64, anchors: bool) -> WordGoalInputs {
        WordGoalInputs {
            base_goal: 1000,
            streak_day_count: streak,
            days_since_last_wrote: days,
            latest_entry_anchors_streak: anchors,
        }
    }

    #[test]
    fn test_new_user_gets_floor() {
        assert_eq!(inputs(0, 0, false).adjusted_goal(), 100);
        assert_eq!(inputs(0, 30, false).adjusted_goal(), 100);
    }

    #[test]
    fn test_mature_streak_recent_gets_full_goal() {
        assert_eq!(inputs(12, 0, true).adjusted_goal(), 1000);
        assert_eq!(inputs(10, 1, false).adjusted_goal(), 1000);
    }

    #[test]
    fn test_mature_streak_decays_linearly() {
        assert_eq!(inputs(12, 3, false).adjusted_goal(), 700);
        assert_eq!(inputs(12, 9, false).adjusted_goal(), 100);
        assert_eq!(inputs(12, 10, false).adjusted_goal(), 100);
    }

    #[test]
    fn test_young_streak_scales_with_bonus() {
        assert_eq!(inputs(3, 0, false).adjusted_goal(), 300);
        assert_eq!(inputs(3, 1, true).adjusted_goal(), 400);
        // 0.9 + 0.1 reaches the full goal exactly
        assert_eq!(inputs(9, 0, true).adjusted_goal(), 1000);
        // 0.7 + 0.1 with no drift
        assert_eq!(inputs(7, 0, true).adjusted_goal(), 800);
    }

    #[test]
    fn test_young_streak_after_lapse_falls_to_floor() {
        assert_eq!(inputs(5, 2, true).adjusted_goal(), 100);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let odd = WordGoalInputs {
            base_goal: 333,
            ..inputs(7, 0, false)
        };
        assert_eq!(odd.adjusted_goal(), 233);
    }

    #[test]
    fn test_whole_days_between() {
        let reference = at("2024-05-10 12:00:00");
        assert_eq!(whole_days_between(at("2024-05-10 01:00:00"), reference), 0);
        assert_eq!(whole_days_between(at("2024-05-09 11:00:00"), reference), 1);
        assert_eq!(whole_days_between(at("2024-05-07 12:00:00"), reference), 3);
        // Entries stamped after the reference count as today
        assert_eq!(whole_days_between(at("2024-05-11 12:00:00"), reference), 0);
    }

    #[tokio::test]
    async fn test_inputs_from_storage() {
        let pool = setup_test_db().await;
        insert_user(&pool, "U_1", "writer", None).await;
        insert_entry(&pool, "E_old", "writer", 1200, true, "2024-05-01 09:00:00.000").await;
        insert_entry(&pool, "E_new", "writer", 1100, true, "2024-05-07 09:00:00.000").await;
        insert_entry(&pool, "E_miss", "writer", 50, false, "2024-05-09 09:00:00.000").await;
        insert_streak(&pool, "K_1", "writer", 12, "E_new", "2024-05-07 09:00:00.000").await;

        let inputs = WordGoalCalculator::inputs(&pool, "writer", at("2024-05-10 10:00:00"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(inputs.base_goal, 1000);
        assert_eq!(inputs.streak_day_count, 12);
        assert_eq!(inputs.days_since_last_wrote, 3);
        assert!(inputs.latest_entry_anchors_streak);
        assert_eq!(inputs.adjusted_goal(), 700);
    }

    #[tokio::test]
    async fn test_streak_without_goal_hit_entries_counts_as_recent() {
        let pool = setup_test_db().await;
        insert_user(&pool, "U_1", "writer", None).await;
        insert_streak(&pool, "K_1", "writer", 12, "E_gone", "2024-05-10 09:00:00.000").await;

        let inputs = WordGoalCalculator::inputs(&pool, "writer", at("2024-05-10 10:00:00"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(inputs.streak_day_count, 12);
        assert_eq!(inputs.days_since_last_wrote, 0);
        assert!(!inputs.latest_entry_anchors_streak);
        assert_eq!(inputs.adjusted_goal(), 1000);
    }

    #[tokio::test]
    async fn test_new_user_from_storage_gets_floor() {
        let pool = setup_test_db().await;
        insert_user(&pool, "U_1", "writer", None).await;

        let inputs = WordGoalCalculator::inputs(&pool, "writer", at("2024-05-10 10:00:00"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(inputs.streak_day_count, 0);
        assert_eq!(inputs.adjusted_goal(), 100);
    }

    #[tokio::test]
    async fn test_inputs_for_unknown_user() {
        let pool = setup_test_db().await;

        let inputs = WordGoalCalculator::inputs(&pool, "nobody", at("2024-05-10 10:00:00"))
            .await
            .unwrap();

        assert!(inputs.is_none());
    }
}
