// src/services/billing.rs
//! Subscription status lookups against the billing provider.
//!
//! The donation trigger and the user subscription endpoint only need read access to a
//! subscription's status and plan, so that is all `BillingProvider` exposes.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Billing API key not configured")]
    NotConfigured,

    #[error("Subscription not found: {0}")]
    NotFound(String),

    #[error("Billing request failed: {0}")]
    RequestFailed(String),

    #[error("Billing request timed out")]
    Timeout,

    #[error("Invalid billing response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl BillingConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // BILLING_API_KEY - secret key for the billing provider
        if let Ok(key) = env::var("BILLING_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key.trim().to_string());
            }
        }

        // BILLING_API_BASE_URL - override for testing against a mock provider
        if let Ok(url) = env::var("BILLING_API_BASE_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }

        // BILLING_TIMEOUT_SECS - upper bound for a single lookup
        if let Ok(secs) = env::var("BILLING_TIMEOUT_SECS") {
            if let Ok(val) = secs.parse::<u64>() {
                config.timeout = Duration::from_secs(val);
            }
        }

        config
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingPlan {
    pub id: String,
    pub nickname: Option<String>,
    pub product: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingSubscription {
    pub id: String,
    pub status: String,
    pub plan: Option<BillingPlan>,
    pub current_period_end: Option<i64>,
    pub trial_end: Option<i64>,
    pub cancel_at: Option<i64>,
}

impl BillingSubscription {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn plan_nickname(&self) -> Option<&str> {
        self.plan.as_ref().and_then(|p| p.nickname.as_deref())
    }
}

#[async_trait]
pub trait BillingProvider: Send + Sync {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, BillingError>;
}

/// HTTP client for the billing provider's subscription API
#[derive(Debug, Clone)]
pub struct StripeBillingClient {
    http: Client,
    config: BillingConfig,
}

impl StripeBillingClient {
    pub fn new(http: Client, config: BillingConfig) -> Self {
        if config.api_key.is_none() {
            warn!("BILLING_API_KEY not set; subscription lookups will fail and donations are skipped");
        }
        Self { http, config }
    }

    fn subscription_url(&self, subscription_id: &str) -> String {
        format!("{}/subscriptions/{}", self.config.base_url, subscription_id)
    }
}

#[async_trait]
impl BillingProvider for StripeBillingClient {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, BillingError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(BillingError::NotConfigured)?;

        debug!(subscription_id = %subscription_id, "Fetching subscription from billing provider");

        let response = self
            .http
            .get(self.subscription_url(subscription_id))
            .bearer_auth(api_key)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BillingError::Timeout
                } else {
                    BillingError::RequestFailed(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(BillingError::NotFound(subscription_id.to_string())),
            status if !status.is_success() => {
                return Err(BillingError::RequestFailed(format!(
                    "billing provider returned {}",
                    status
                )))
            }
            _ => {}
        }

        response
            .json::<BillingSubscription>()
            .await
            .map_err(|e| BillingError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = BillingConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "https://api.stripe.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_subscription_deserializes_provider_payload() {
        let payload = serde_json::json!({
            "id": "sub_GIHImr4be4B275",
            "object": "subscription",
            "status": "active",
            "current_period_end": 1_700_000_000,
            "trial_end": null,
            "cancel_at": null,
            "plan": { "id": "plan_1", "nickname": "Yearly Pro", "product": "prod_1", "amount": 5000 }
        });

        let subscription: BillingSubscription = serde_json::from_value(payload).unwrap();

        assert!(subscription.is_active());
        assert_eq!(subscription.plan_nickname(), Some("Yearly Pro"));
        assert_eq!(subscription.current_period_end, Some(1_700_000_000));
    }

    #[test]
    fn test_subscription_without_plan_has_no_nickname() {
        let payload = serde_json::json!({ "id": "sub_1", "status": "past_due" });
        let subscription: BillingSubscription = serde_json::from_value(payload).unwrap();

        assert!(!subscription.is_active());
        assert_eq!(subscription.plan_nickname(), None);
    }

    #[tokio::test]
    async fn test_lookup_without_api_key_is_not_configured() {
        let client = StripeBillingClient::new(Client::new(), BillingConfig::default());

        let result = client.get_subscription("sub_1").await;
        assert!(matches!(result, Err(BillingError::NotConfigured)));
    }

    #[test]
    fn test_subscription_url() {
        let config = BillingConfig {
            base_url: "http://localhost:12111/v1".to_string(),
            ..BillingConfig::default()
        };
        let client = StripeBillingClient::new(Client::new(), config);

        assert_eq!(
            client.subscription_url("sub_42"),
            "http://localhost:12111/v1/subscriptions/sub_42"
        );
    }
}
