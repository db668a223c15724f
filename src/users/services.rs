use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use super::models::{
    CreateUserRequest, LinkSubscriptionRequest, UpdateUserRequest, User, DEFAULT_WORD_GOAL,
};
use crate::common::helpers::{format_timestamp, safe_identity_log};
use crate::common::{generate_user_id, safe_email_log, ApiError, Validator};
use crate::services::billing::{BillingProvider, BillingSubscription};

pub struct UsersService {
    db: SqlitePool,
}

impl UsersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    pub async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn get_user_by_identity(&self, identity_id: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE identity_id = ?")
            .bind(identity_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Load a user and require that the caller is its linked identity
    async fn owned_user(&self, caller: &str, user_id: &str) -> Result<User, ApiError> {
        let user = self.get_user(user_id).await?;

        if user.identity_id.as_deref() != Some(caller) {
            warn!(
                user_id = %user_id,
                caller = %safe_identity_log(caller),
                "Caller is not the identity linked to this user"
            );
            return Err(ApiError::access_denied());
        }

        Ok(user)
    }

    // ============================================================================
    // Writes
    // ============================================================================

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        request.validate(&request).into_result()?;

        let user_id = generate_user_id();
        let now = format_timestamp(&Utc::now());
        let email = request.email.trim().to_lowercase();

        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, word_goal, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(request.first_name.trim())
        .bind(&request.last_name)
        .bind(&email)
        .bind(request.word_goal.unwrap_or(DEFAULT_WORD_GOAL))
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, email = %safe_email_log(&email), "Database error creating user");
            ApiError::DatabaseError(e)
        })?;

        info!(user_id = %user_id, email = %safe_email_log(&email), "User created");

        self.get_user(&user_id).await
    }

    pub async fn update_user(
        &self,
        caller: &str,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        request.validate(&request).into_result()?;
        self.owned_user(caller, user_id).await?;

        let now = format_timestamp(&Utc::now());
        let email = request.email.map(|e| e.trim().to_lowercase());

        sqlx::query(
            r#"
            UPDATE users SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                email = COALESCE(?, email),
                word_goal = COALESCE(?, word_goal),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&email)
        .bind(request.word_goal)
        .bind(&now)
        .bind(user_id)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "Database error updating user");
            ApiError::DatabaseError(e)
        })?;

        info!(user_id = %user_id, "User updated");

        self.get_user(user_id).await
    }

    /// Attach the caller's identity to a freshly created user
    pub async fn complete_signup(
        &self,
        caller: &str,
        user_id: &str,
        identity_id: &str,
    ) -> Result<User, ApiError> {
        if identity_id != caller {
            return Err(ApiError::access_denied());
        }

        let user = self.get_user(user_id).await?;
        match user.identity_id.as_deref() {
            Some(existing) if existing == identity_id => return Ok(user),
            Some(_) => {
                return Err(ApiError::BadRequest(
                    "User is already linked to another identity".to_string(),
                ))
            }
            None => {}
        }

        sqlx::query("UPDATE users SET identity_id = ?, updated_at = ? WHERE id = ?")
            .bind(identity_id)
            .bind(format_timestamp(&Utc::now()))
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user_id, "Database error completing signup");
                ApiError::DatabaseError(e)
            })?;

        info!(
            user_id = %user_id,
            identity = %safe_identity_log(identity_id),
            email = %safe_email_log(&user.email),
            "Signup completed"
        );

        self.get_user(user_id).await
    }

    pub async fn link_subscription(
        &self,
        caller: &str,
        user_id: &str,
        request: LinkSubscriptionRequest,
    ) -> Result<User, ApiError> {
        self.owned_user(caller, user_id).await?;

        if request.billing_subscription_id.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "billing_subscription_id is required".to_string(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE users SET
                billing_customer_id = COALESCE(?, billing_customer_id),
                billing_subscription_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.billing_customer_id)
        .bind(request.billing_subscription_id.trim())
        .bind(format_timestamp(&Utc::now()))
        .bind(user_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(user_id = %user_id, "Billing subscription linked");

        self.get_user(user_id).await
    }

    /// Live subscription for a user, None when unlinked or the lookup fails
    pub async fn subscription_status(
        &self,
        caller: &str,
        user_id: &str,
        billing: &dyn BillingProvider,
    ) -> Result<Option<BillingSubscription>, ApiError> {
        let user = self.owned_user(caller, user_id).await?;

        let subscription_id = match user.billing_subscription_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => return Ok(None),
        };

        match billing.get_subscription(&subscription_id).await {
            Ok(subscription) => Ok(Some(subscription)),
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Subscription lookup failed");
                Ok(None)
            }
        }
    }
}
