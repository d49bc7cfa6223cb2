use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::ReviewCellState;

pub fn review_routes(state: ReviewCellState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_reviews));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/", post(handlers::add_review))
        .route("/{review_id}", put(handlers::update_review).delete(handlers::delete_review))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
