use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route(
            "/sessions",
            post(handlers::create_session).get(handlers::list_sessions),
        )
        .route(
            "/sessions/:session_id",
            get(handlers::get_session)
                .patch(handlers::update_session)
                .delete(handlers::delete_session),
        )
        // Templates and settings
        .route("/templates", get(handlers::list_templates))
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::save_settings),
        )
        // External model services
        .route("/transcribe", post(handlers::transcribe))
        .route("/notes/write", post(handlers::write_note))
        .route("/notes/edit", post(handlers::edit_note))
        .route("/notes/synthesize", post(handlers::synthesize_note))
        // Recorded encounters exceed the default 2 MB body cap
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        // Tracing middleware for request logging; permissive CORS because
        // the browser UI is served from a different origin
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
