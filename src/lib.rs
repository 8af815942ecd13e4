pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod views;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{ensure_admin, ensure_authenticated, ensure_not_authenticated, session_middleware};
pub use crate::state::AppState;

/// The whole HTTP surface, ready to serve.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        // Public
        .route("/", get(handlers::public::home))
        .route("/health", get(handlers::public::health))
        .merge(anonymous_routes())
        // Logged in
        .merge(protected_routes())
        // Admin slots
        .merge(elevated_routes())
        .nest_service("/static", static_dir)
        .fallback(handlers::public::not_found)
        // Global middleware
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn anonymous_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/login", get(auth::login_get).post(auth::login_post))
        .route("/auth/register", get(auth::register_get).post(auth::register_post))
        .route_layer(from_fn(ensure_not_authenticated))
}

fn protected_routes() -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/auth/logout", get(protected::logout))
        .route(
            "/complaints/add",
            get(protected::add_complaint_get).post(protected::add_complaint_post),
        )
        .route("/complaints/my-complaints", get(protected::my_complaints))
        .route("/complaints/all", get(protected::all_complaints))
        .route("/user/profile", get(protected::profile))
        .route_layer(from_fn(ensure_authenticated))
}

fn elevated_routes() -> Router<AppState> {
    use handlers::elevated;

    Router::new()
        .route("/admin", get(elevated::dashboard))
        .route("/complaints/resolved", get(elevated::resolved_complaints))
        .route("/complaints/update-status", post(elevated::update_status))
        // last added runs first: login is checked before the role
        .route_layer(from_fn(ensure_admin))
        .route_layer(from_fn(ensure_authenticated))
}
