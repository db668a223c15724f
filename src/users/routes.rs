use crate::users::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn users_routes() -> Router {
    Router::new()
        .route("/api/users", post(handlers::create_user))
        .route(
            "/api/users/by-identity/:identity_id",
            get(handlers::get_user_by_identity),
        )
        .route(
            "/api/users/:id",
            get(handlers::get_user).put(handlers::update_user),
        )
        .route(
            "/api/users/:id/complete-signup",
            post(handlers::complete_signup),
        )
        .route(
            "/api/users/:id/subscription",
            get(handlers::get_subscription).put(handlers::link_subscription),
        )
}
