use axum::{
    Router,
    routing::{get, put},
    middleware,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::ComplaintCellState;

pub fn complaint_routes(state: ComplaintCellState) -> Router {
    // Every complaint route is authenticated; admin checks happen in the handlers
    Router::new()
        .route("/user", get(handlers::get_user_complaints).post(handlers::create_complaint))
        .route("/", get(handlers::get_complaints))
        .route("/{complaint_id}", put(handlers::update_complaint))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
