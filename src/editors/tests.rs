#[cfg(test)]
mod tests {
    use crate::auth::AuthedUser;
    use crate::common::test_support::{setup_test_db, test_state, FakeBilling};
    use crate::common::ApiError;
    use crate::editors::handlers;
    use crate::editors::models::*;
    use axum::{extract::Path, http::StatusCode, Extension, Json};
    use std::sync::Arc;

    fn caller(id: &str) -> AuthedUser {
        AuthedUser {
            id: id.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_preferences_default_to_shown() {
        let request: CreateEditorRequest =
            serde_json::from_value(serde_json::json!({ "user_id": "writer", "show_prompt": false }))
                .unwrap();

        assert!(request.show_toolbar);
        assert!(!request.show_prompt);
        assert!(request.show_counter);
    }

    #[tokio::test]
    async fn test_create_list_and_get() {
        let pool = setup_test_db().await;
        let state = test_state(&pool, Arc::new(FakeBilling::missing()));

        let (status, Json(created)) = handlers::create_editor(
            Extension(state.clone()),
            caller("writer"),
            Json(CreateEditorRequest {
                user_id: "writer".to_string(),
                show_toolbar: false,
                show_prompt: true,
                show_counter: true,
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(created.id.starts_with("R_"));
        assert!(!created.show_toolbar);

        let Json(listed) = handlers::list_editors(Extension(state.clone()), caller("writer"))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        let Json(others) = handlers::list_editors(Extension(state.clone()), caller("other"))
            .await
            .unwrap();
        assert!(others.is_empty());

        let Json(fetched) = handlers::get_editor(
            Extension(state.clone()),
            caller("writer"),
            Path(created.id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(fetched.id, created.id);

        let denied =
            handlers::get_editor(Extension(state), caller("other"), Path(created.id)).await;
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_for_someone_else_is_denied() {
        let pool = setup_test_db().await;
        let state = test_state(&pool, Arc::new(FakeBilling::missing()));

        let result = handlers::create_editor(
            Extension(state),
            caller("intruder"),
            Json(CreateEditorRequest {
                user_id: "writer".to_string(),
                show_toolbar: true,
                show_prompt: true,
                show_counter: true,
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_missing_editor_is_not_found() {
        let pool = setup_test_db().await;
        let state = test_state(&pool, Arc::new(FakeBilling::missing()));

        let result =
            handlers::get_editor(Extension(state), caller("writer"), Path("R_NOPE".to_string()))
                .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
