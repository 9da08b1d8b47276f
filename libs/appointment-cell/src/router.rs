use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, patch},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    // The public booking form posts here without a session.
    let public_routes = Router::new()
        .route("/", post(handlers::book_appointment_public));

    // Staff-facing routes (session required)
    let protected_routes = Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/manual", post(handlers::create_manual_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", patch(handlers::transition_status))
        .route("/patients", get(handlers::list_patients))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
