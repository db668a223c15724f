// src/stats/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which entries the aggregates cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsScope {
    Global,
    User(String),
}

impl StatsScope {
    /// Owner filter bound into the aggregate queries, None for global
    pub fn user_filter(&self) -> Option<&str> {
        match self {
            StatsScope::Global => None,
            StatsScope::User(user_id) => Some(user_id.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PreferredWritingTime {
    pub hour: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub words_written: i64,
    pub longest_entry: i64,
    pub longest_streak: i64,
    /// 0 = Sunday .. 6 = Saturday, None without entries
    pub preferred_day_of_week: Option<i64>,
    pub preferred_hour_of_day: Option<i64>,
    /// Hour histogram of entry updates, most common first
    pub preferred_writing_times: Vec<PreferredWritingTime>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub global: bool,
}
