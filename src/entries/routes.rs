use crate::entries::handlers;
use axum::{routing::get, Router};

pub fn entries_routes() -> Router {
    Router::new()
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        // Static segment takes precedence over /:id
        .route("/api/entries/daily", get(handlers::daily_entry))
        .route(
            "/api/entries/:id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route("/api/word-goal", get(handlers::word_goal))
}
