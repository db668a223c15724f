use crate::editors::handlers;
use axum::{routing::get, Router};

pub fn editors_routes() -> Router {
    Router::new()
        .route(
            "/api/editors",
            get(handlers::list_editors).post(handlers::create_editor),
        )
        .route("/api/editors/:id", get(handlers::get_editor))
}
