// Entry and word-goal handlers

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::extractors::AuthedUser;
use crate::common::error::ApiError;
use crate::common::state::AppState;
use crate::entries::models::{
    CreateEntryRequest, DailyEntryQuery, DeletedEntryResponse, EntriesQuery, Entry,
    UpdateEntryRequest, WordGoalQuery, WordGoalResponse,
};

pub async fn list_entries(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let state = state_lock.read().await.clone();
    let entries = state.entry_service.list_entries(&authed.id, &query).await?;
    Ok(Json(entries))
}

pub async fn create_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let state = state_lock.read().await.clone();
    let entry = state.entry_service.create_entry(&authed.id, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn daily_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Query(query): Query<DailyEntryQuery>,
) -> Result<Json<Entry>, ApiError> {
    let state = state_lock.read().await.clone();
    let entry = state.entry_service.daily_entry(&authed.id, &query).await?;
    Ok(Json(entry))
}

pub async fn get_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let state = state_lock.read().await.clone();
    let entry = state.entry_service.get_entry(&authed.id, &entry_id).await?;
    Ok(Json(entry))
}

/// Save an edit; goal hits advance the streak and may earn a donation
pub async fn update_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<Entry>, ApiError> {
    let state = state_lock.read().await.clone();
    let update = state
        .entry_service
        .update_entry(&authed.id, &entry_id, request)
        .await?;
    Ok(Json(update.entry))
}

pub async fn delete_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
) -> Result<Json<DeletedEntryResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    state.entry_service.delete_entry(&authed.id, &entry_id).await?;
    Ok(Json(DeletedEntryResponse {
        id: entry_id,
        deleted: true,
    }))
}

pub async fn word_goal(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Query(query): Query<WordGoalQuery>,
) -> Result<Json<WordGoalResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let reference = query.date.unwrap_or_else(Utc::now);
    let word_goal = state
        .entry_service
        .word_goal(&authed.id, &query.user_id, reference)
        .await?;

    Ok(Json(WordGoalResponse {
        user_id: query.user_id,
        word_goal,
    }))
}
