use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/settings", get(handlers::get_settings_public));

    let protected_routes = Router::new()
        .route("/stats", get(handlers::get_dashboard_stats))
        .route("/settings", put(handlers::update_settings))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
