// Shared fixtures for unit tests: in-memory database, seed rows and a scripted billing provider

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::auth::models::Claims;
use crate::common::dev_mode::DevModeConfig;
use crate::common::migrations::run_migrations;
use crate::common::AppState;
use crate::entries::services::{DonationTrigger, EntryService};
use crate::services::billing::{BillingError, BillingPlan, BillingProvider, BillingSubscription};
use crate::services::EncryptionService;
use crate::stats::services::StatsService;

pub const TEST_JWT_SECRET: &str = "test_identity_secret";

/// Fresh schema in a private in-memory database.
///
/// Each SQLite memory connection is its own database, so the pool is pinned to one.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();

    pool
}

/// UTC instant from "YYYY-MM-DD HH:MM:SS"
pub fn at(value: &str) -> DateTime<Utc> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap();
    Utc.from_utc_datetime(&naive)
}

pub fn test_encryption() -> Arc<EncryptionService> {
    Arc::new(EncryptionService::from_key(&EncryptionService::generate_key()).unwrap())
}

pub fn entry_service(pool: &SqlitePool, billing: Arc<dyn BillingProvider>) -> EntryService {
    let donations = DonationTrigger::new(pool.clone(), billing, Duration::from_millis(200));
    EntryService::new(pool.clone(), test_encryption(), donations)
}

/// Shared state as the router sees it, dev mode off
pub fn test_state(pool: &SqlitePool, billing: Arc<dyn BillingProvider>) -> Arc<RwLock<AppState>> {
    let donations = DonationTrigger::new(pool.clone(), billing.clone(), Duration::from_millis(200));

    Arc::new(RwLock::new(AppState {
        db: pool.clone(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        dev_mode: DevModeConfig::disabled(),
        billing,
        entry_service: Arc::new(EntryService::new(pool.clone(), test_encryption(), donations)),
        stats_service: Arc::new(StatsService::new(pool.clone())),
    }))
}

/// HS256 identity token for `sub`, signed with `TEST_JWT_SECRET`
pub fn token_for(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: 9_999_999_999,
        email: Some("writer@example.com".to_string()),
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub async fn insert_user(
    pool: &SqlitePool,
    id: &str,
    identity_id: &str,
    subscription_id: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO users (id, identity_id, billing_subscription_id, first_name, email) VALUES (?, ?, ?, 'Test', 'test@example.com')",
    )
    .bind(id)
    .bind(identity_id)
    .bind(subscription_id)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_entry(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    word_count: i64,
    goal_hit: bool,
    created_at: &str,
) {
    sqlx::query(
        "INSERT INTO entries (id, user_id, word_count, content, goal_hit, created_at, updated_at) VALUES (?, ?, ?, '', ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(word_count)
    .bind(goal_hit)
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_streak(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    day_count: i64,
    last_entry_id: &str,
    updated_at: &str,
) {
    sqlx::query(
        "INSERT INTO streaks (id, user_id, day_count, last_entry_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(day_count)
    .bind(last_entry_id)
    .bind(updated_at)
    .bind(updated_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

pub fn subscription(status: &str, nickname: Option<&str>) -> BillingSubscription {
    BillingSubscription {
        id: "sub_test".to_string(),
        status: status.to_string(),
        plan: Some(BillingPlan {
            id: "plan_test".to_string(),
            nickname: nickname.map(str::to_string),
            product: None,
        }),
        current_period_end: None,
        trial_end: None,
        cancel_at: None,
    }
}

/// Billing provider that answers with a fixed subscription after an optional delay
pub struct FakeBilling {
    subscription: Option<BillingSubscription>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeBilling {
    pub fn returning(subscription: BillingSubscription) -> Self {
        Self {
            subscription: Some(subscription),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every lookup fails with `NotFound`
    pub fn missing() -> Self {
        Self {
            subscription: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillingProvider for FakeBilling {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, BillingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.subscription
            .clone()
            .ok_or_else(|| BillingError::NotFound(subscription_id.to_string()))
    }
}
