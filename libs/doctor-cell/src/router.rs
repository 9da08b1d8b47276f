use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put, patch},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors_public))
        .route("/{doctor_id}", get(handlers::get_doctor_public))
        .route("/{doctor_id}/slots", get(handlers::get_day_slots_public));

    // Protected routes (staff session required)
    let protected_routes = Router::new()
        .route("/manage", get(handlers::list_doctors))
        .route("/manage", post(handlers::create_doctor))
        .route("/manage/{doctor_id}", put(handlers::update_doctor))
        .route("/manage/{doctor_id}/deactivate", patch(handlers::deactivate_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
