// src/entries/services/donation_trigger.rs
//! Milestone donations for paying subscribers.
//!
//! Runs after the entry transaction commits. Every failure here is logged and
//! absorbed; the caller's entry save never depends on the outcome.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::common::generate_donation_id;
use crate::common::helpers::format_timestamp;
use crate::entries::models::Donation;
use crate::services::BillingProvider;

/// Streak-day interval for plans whose nickname mentions "yearly"
pub const YEARLY_CADENCE: i64 = 7;
/// Streak-day interval for every other plan
pub const DEFAULT_CADENCE: i64 = 14;
pub const DONATION_AMOUNT: i64 = 1;

/// Milestone interval for a subscription plan
pub fn milestone_cadence(plan_nickname: Option<&str>) -> i64 {
    match plan_nickname {
        Some(nickname) if nickname.to_lowercase().contains("yearly") => YEARLY_CADENCE,
        _ => DEFAULT_CADENCE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSubscription,
    LookupFailed,
    LookupTimedOut,
    InactiveSubscription,
    StorageFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DonationOutcome {
    Created(Donation),
    AlreadyDonated,
    NotMilestone,
    Skipped(SkipReason),
}

#[derive(Clone)]
pub struct DonationTrigger {
    db: SqlitePool,
    billing: Arc<dyn BillingProvider>,
    lookup_timeout: Duration,
}

impl DonationTrigger {
    pub fn new(db: SqlitePool, billing: Arc<dyn BillingProvider>, lookup_timeout: Duration) -> Self {
        Self {
            db,
            billing,
            lookup_timeout,
        }
    }

    /// Decide whether the streak's new day count earns a donation for `entry_id`
    pub async fn evaluate(
        &self,
        user_id: &str,
        entry_id: &str,
        day_count: i64,
        reference: DateTime<Utc>,
    ) -> DonationOutcome {
        let outcome = match self.try_evaluate(user_id, entry_id, day_count, reference).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, user_id = %user_id, entry_id = %entry_id, "Donation check failed on storage");
                DonationOutcome::Skipped(SkipReason::StorageFailed)
            }
        };

        match &outcome {
            DonationOutcome::Created(donation) => info!(
                user_id = %user_id,
                entry_id = %entry_id,
                donation_id = %donation.id,
                day_count = day_count,
                "Milestone donation created"
            ),
            DonationOutcome::AlreadyDonated => info!(
                user_id = %user_id,
                entry_id = %entry_id,
                "Entry already has a donation"
            ),
            DonationOutcome::NotMilestone => {}
            DonationOutcome::Skipped(reason) => info!(
                user_id = %user_id,
                entry_id = %entry_id,
                day_count = day_count,
                reason = ?reason,
                "Donation skipped"
            ),
        }

        outcome
    }

    async fn try_evaluate(
        &self,
        user_id: &str,
        entry_id: &str,
        day_count: i64,
        reference: DateTime<Utc>,
    ) -> Result<DonationOutcome, sqlx::Error> {
        // Both cadences are multiples of the yearly one
        if day_count <= 0 || day_count % YEARLY_CADENCE != 0 {
            return Ok(DonationOutcome::NotMilestone);
        }

        let subscription_id: Option<String> = sqlx::query_scalar(
            "SELECT billing_subscription_id FROM users WHERE identity_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .flatten();

        let subscription_id = match subscription_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => return Ok(DonationOutcome::Skipped(SkipReason::NoSubscription)),
        };

        let lookup = tokio::time::timeout(
            self.lookup_timeout,
            self.billing.get_subscription(&subscription_id),
        )
        .await;

        let subscription = match lookup {
            Ok(Ok(subscription)) => subscription,
            Ok(Err(e)) => {
                warn!(error = %e, user_id = %user_id, "Billing lookup failed");
                return Ok(DonationOutcome::Skipped(SkipReason::LookupFailed));
            }
            Err(_) => {
                warn!(
                    user_id = %user_id,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Billing lookup timed out"
                );
                return Ok(DonationOutcome::Skipped(SkipReason::LookupTimedOut));
            }
        };

        if !subscription.is_active() {
            return Ok(DonationOutcome::Skipped(SkipReason::InactiveSubscription));
        }

        if day_count % milestone_cadence(subscription.plan_nickname()) != 0 {
            return Ok(DonationOutcome::NotMilestone);
        }

        self.insert_once(user_id, entry_id, reference).await
    }

    /// Insert the donation unless one already exists for (user, entry)
    async fn insert_once(
        &self,
        user_id: &str,
        entry_id: &str,
        reference: DateTime<Utc>,
    ) -> Result<DonationOutcome, sqlx::Error> {
        let now = format_timestamp(&reference);
        let donation = Donation {
            id: generate_donation_id(),
            user_id: user_id.to_string(),
            amount: DONATION_AMOUNT,
            entry_id: Some(entry_id.to_string()),
            paid: false,
            created_at: now.clone(),
            updated_at: now,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO donations (id, user_id, amount, entry_id, paid, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, entry_id) DO NOTHING
            "#,
        )
        .bind(&donation.id)
        .bind(&donation.user_id)
        .bind(donation.amount)
        .bind(&donation.entry_id)
        .bind(donation.paid)
        .bind(&donation.created_at)
        .bind(&donation.updated_at)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            Ok(DonationOutcome::AlreadyDonated)
        } else {
            Ok(DonationOutcome::Created(donation))
        }
    }
}
