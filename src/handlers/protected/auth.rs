// handlers/protected/auth.rs - GET /auth/logout

use axum::response::{IntoResponse, Response};
use axum::Extension;

use crate::middleware::{FlashRedirect, Principal};

pub async fn logout(Extension(Principal(user)): Extension<Principal>) -> Response {
    tracing::info!("{} logged out", user.email);
    FlashRedirect::to("/").logout().into_response()
}
