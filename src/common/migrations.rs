// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// SQLite expression producing the same layout as `helpers::DB_TIMESTAMP_FORMAT`
const NOW_DEFAULT: &str = "(strftime('%Y-%m-%d %H:%M:%f', 'now'))";

/// Run all database migrations
///
/// Tables are created if missing. Setting `RESET_DB=true` drops everything first.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Only drop tables if RESET_DB environment variable is set to "true"
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    } else {
        info!("ℹ️  Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_core_tables(pool).await?;
    create_journal_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Drop tables in reverse dependency order
    let tables = ["donations", "streaks", "entries", "editors", "users"];

    for table in tables {
        let _ = sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await;
    }

    Ok(())
}

async fn create_core_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Users table. identity_id stays NULL until signup is completed.
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            identity_id TEXT UNIQUE,
            billing_customer_id TEXT,
            billing_subscription_id TEXT,
            first_name TEXT NOT NULL,
            last_name TEXT,
            email TEXT NOT NULL,
            word_goal INTEGER NOT NULL DEFAULT 1000,
            created_at TEXT NOT NULL DEFAULT {now},
            updated_at TEXT NOT NULL DEFAULT {now}
        )
        "#,
        now = NOW_DEFAULT
    ))
    .execute(pool)
    .await?;

    // Editor preferences table
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS editors (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            show_toolbar INTEGER NOT NULL DEFAULT 1,
            show_prompt INTEGER NOT NULL DEFAULT 1,
            show_counter INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT {now},
            updated_at TEXT NOT NULL DEFAULT {now}
        )
        "#,
        now = NOW_DEFAULT
    ))
    .execute(pool)
    .await?;

    Ok(())
}

/// Entries, streaks and donations. `user_id` on these tables is the caller's identity id.
async fn create_journal_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            word_count INTEGER NOT NULL DEFAULT 0 CHECK (word_count >= 0),
            content TEXT NOT NULL DEFAULT '',
            goal_hit INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT {now},
            updated_at TEXT NOT NULL DEFAULT {now}
        )
        "#,
        now = NOW_DEFAULT
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS streaks (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            day_count INTEGER NOT NULL CHECK (day_count >= 1),
            last_entry_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT {now},
            updated_at TEXT NOT NULL DEFAULT {now}
        )
        "#,
        now = NOW_DEFAULT
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS donations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            amount INTEGER NOT NULL,
            entry_id TEXT,
            paid INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT {now},
            updated_at TEXT NOT NULL DEFAULT {now}
        )
        "#,
        now = NOW_DEFAULT
    ))
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_editors_user_id ON editors(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_entries_user_created ON entries(user_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_entries_user_goal_hit ON entries(user_id, goal_hit, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_streaks_user_updated ON streaks(user_id, updated_at)",
        // One donation per (user, entry); the donation insert relies on this for ON CONFLICT
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_donations_user_entry ON donations(user_id, entry_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    info!("📊 Created journal indexes");

    Ok(())
}
