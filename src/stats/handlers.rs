use axum::{extract::Query, Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::extractors::AuthedUser;
use crate::common::error::ApiError;
use crate::common::state::AppState;
use crate::stats::models::{Stats, StatsQuery, StatsScope};

/// Writing stats for the caller, or across all users with `?global=true`
pub async fn get_stats(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Stats>, ApiError> {
    let state = state_lock.read().await.clone();

    let scope = if query.global {
        StatsScope::Global
    } else {
        StatsScope::User(authed.id.clone())
    };

    let stats = state.stats_service.stats(&authed.id, scope).await?;
    Ok(Json(stats))
}
