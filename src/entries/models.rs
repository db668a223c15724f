// src/entries/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Stored records
// ============================================================================

/// One journal submission. `content` holds ciphertext while inside the service
/// layer and plaintext once handed back to a handler.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    pub word_count: i64,
    pub content: String,
    pub goal_hit: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Streak {
    pub id: String,
    pub user_id: String,
    pub day_count: i64,
    pub last_entry_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Donation {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub entry_id: Option<String>,
    pub paid: bool,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub user_id: String,
    #[serde(default)]
    pub word_count: i64,
    #[serde(default)]
    pub content: String,
}

/// Body of `PUT /api/entries/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEntryRequest {
    pub user_id: String,
    pub word_count: i64,
    pub content: String,
    pub goal_hit: bool,
    /// Moment of the write as seen by the client; defaults to the server clock
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub user_id: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DailyEntryQuery {
    pub user_id: String,
    /// Start of the caller's current day
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct WordGoalQuery {
    pub user_id: String,
    pub date: Option<DateTime<Utc>>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WordGoalResponse {
    pub user_id: String,
    pub word_goal: i64,
}

#[derive(Debug, Serialize)]
pub struct DeletedEntryResponse {
    pub id: String,
    pub deleted: bool,
}
