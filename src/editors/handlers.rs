// Editor preference handlers

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::models::{CreateEditorRequest, Editor};
use crate::auth::AuthedUser;
use crate::common::helpers::format_timestamp;
use crate::common::{generate_editor_id, ApiError, AppState};

/// GET /api/editors - The caller's editor preferences
pub async fn list_editors(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Editor>>, ApiError> {
    let state = state_lock.read().await.clone();

    let editors = sqlx::query_as::<_, Editor>(
        "SELECT * FROM editors WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(editors))
}

/// GET /api/editors/:id
pub async fn get_editor(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(editor_id): Path<String>,
) -> Result<Json<Editor>, ApiError> {
    let state = state_lock.read().await.clone();

    let editor = sqlx::query_as::<_, Editor>("SELECT * FROM editors WHERE id = ?")
        .bind(&editor_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Editor not found".to_string()))?;

    if editor.user_id != authed.id {
        return Err(ApiError::access_denied());
    }

    Ok(Json(editor))
}

/// POST /api/editors
pub async fn create_editor(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(input): Json<CreateEditorRequest>,
) -> Result<(StatusCode, Json<Editor>), ApiError> {
    if input.user_id != authed.id {
        return Err(ApiError::access_denied());
    }

    let state = state_lock.read().await.clone();
    let now = format_timestamp(&Utc::now());
    let editor = Editor {
        id: generate_editor_id(),
        user_id: input.user_id,
        show_toolbar: input.show_toolbar,
        show_prompt: input.show_prompt,
        show_counter: input.show_counter,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO editors (id, user_id, show_toolbar, show_prompt, show_counter, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&editor.id)
    .bind(&editor.user_id)
    .bind(editor.show_toolbar)
    .bind(editor.show_prompt)
    .bind(editor.show_counter)
    .bind(&editor.created_at)
    .bind(&editor.updated_at)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %editor.user_id, "Database error creating editor");
        ApiError::DatabaseError(e)
    })?;

    info!(user_id = %editor.user_id, editor_id = %editor.id, "Editor preferences created");

    Ok((StatusCode::CREATED, Json(editor)))
}
