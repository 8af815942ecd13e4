// handlers/public/home.rs - GET /, GET /health and the 404 fallback

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;

use crate::auth::resolve_hostel_for_role;
use crate::error::AppError;
use crate::middleware::RequestContext;
use crate::state::AppState;
use crate::views::{self, ErrorTemplate, HomeTemplate, PageChrome};

pub async fn home(Extension(ctx): Extension<RequestContext>) -> Result<Html<String>, AppError> {
    let hostel = ctx
        .principal
        .as_ref()
        .and_then(|user| resolve_hostel_for_role(user.role))
        .map(|h| h.to_string())
        .unwrap_or_default();

    views::render(&HomeTemplate {
        page: PageChrome::from_context(&ctx),
        hostel,
    })
}

/// Liveness plus a round trip to the store.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok",
                    "version": env!("CARGO_PKG_VERSION"),
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}

pub async fn not_found(ctx: Option<Extension<RequestContext>>) -> Response {
    let mut page = ErrorTemplate::new(StatusCode::NOT_FOUND, "Page not found");
    if let Some(Extension(ctx)) = ctx {
        page.page = PageChrome::from_context(&ctx);
    }
    match views::render(&page) {
        Ok(html) => (StatusCode::NOT_FOUND, html).into_response(),
        Err(e) => e.into_response(),
    }
}
