pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/refresh", post(handlers::handle_refresh))
        .route(
            "/api/v1/session/view/:simulation_id",
            post(handlers::handle_view),
        )
        .route("/api/v1/session/start", post(handlers::handle_start))
        .route(
            "/api/v1/session/actions/:action_id/toggle",
            post(handlers::handle_toggle_action),
        )
        .route(
            "/api/v1/session/justification",
            put(handlers::handle_set_justification),
        )
        .route("/api/v1/session/commit", post(handlers::handle_commit))
        .route("/api/v1/session/back", post(handlers::handle_back))
        .route("/api/v1/session/done", post(handlers::handle_done))
        // Reflection report
        .route("/api/v1/session/report", get(handlers::handle_report))
        .route(
            "/api/v1/session/report/export",
            post(handlers::handle_export),
        )
        .with_state(state)
}
