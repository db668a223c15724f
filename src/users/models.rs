// src/users/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::services::billing::BillingSubscription;

/// Default daily word target for new accounts
pub const DEFAULT_WORD_GOAL: i64 = 1000;

/// Account record. `identity_id` links it to the identity provider once signup completes;
/// journal rows are keyed by that value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub identity_id: Option<String>,
    pub billing_customer_id: Option<String>,
    pub billing_subscription_id: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub word_goal: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub word_goal: Option<i64>,
}

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub word_goal: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteSignupRequest {
    pub identity_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkSubscriptionRequest {
    pub billing_customer_id: Option<String>,
    pub billing_subscription_id: String,
}

/// Live subscription state; `subscription` is null when there is none or the lookup failed
#[derive(Debug, Serialize)]
pub struct SubscriptionStatusResponse {
    pub subscription: Option<BillingSubscription>,
}
