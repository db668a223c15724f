use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{
    CompleteSignupRequest, CreateUserRequest, LinkSubscriptionRequest,
    SubscriptionStatusResponse, UpdateUserRequest, User,
};
use super::services::UsersService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /api/users - Create a user record
pub async fn create_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service.create_user(request).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id
pub async fn get_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    Ok(Json(users_service.get_user(&user_id).await?))
}

/// GET /api/users/by-identity/:identity_id
pub async fn get_user_by_identity(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
    Path(identity_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    Ok(Json(users_service.get_user_by_identity(&identity_id).await?))
}

/// PUT /api/users/:id - Partial profile update
pub async fn update_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service
        .update_user(&authed.id, &user_id, request)
        .await?;

    Ok(Json(user))
}

/// POST /api/users/:id/complete-signup
pub async fn complete_signup(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
    Json(request): Json<CompleteSignupRequest>,
) -> Result<Json<User>, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service
        .complete_signup(&authed.id, &user_id, &request.identity_id)
        .await?;

    Ok(Json(user))
}

/// PUT /api/users/:id/subscription - Record billing ids
pub async fn link_subscription(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
    Json(request): Json<LinkSubscriptionRequest>,
) -> Result<Json<User>, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service
        .link_subscription(&authed.id, &user_id, request)
        .await?;

    Ok(Json(user))
}

/// GET /api/users/:id/subscription - Live status from the billing provider
pub async fn get_subscription(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
) -> Result<Json<SubscriptionStatusResponse>, ApiError> {
    let app_state = state.read().await.clone();
    let users_service = UsersService::new(app_state.db.clone());

    let subscription = users_service
        .subscription_status(&authed.id, &user_id, app_state.billing.as_ref())
        .await?;

    Ok(Json(SubscriptionStatusResponse { subscription }))
}
