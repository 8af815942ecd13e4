use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::database::models::User;

use super::response::FlashRedirect;
use super::session::RequestContext;

/// The authenticated caller, inserted by `ensure_authenticated`.
#[derive(Clone, Debug)]
pub struct Principal(pub User);

fn principal_of(request: &Request) -> Option<User> {
    request
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.principal.clone())
}

/// Lets the request through only when the session has a principal.
pub async fn ensure_authenticated(mut request: Request, next: Next) -> Response {
    match principal_of(&request) {
        Some(user) => {
            request.extensions_mut().insert(Principal(user));
            next.run(request).await
        }
        None => FlashRedirect::to("/auth/login")
            .error("Please log in to view that resource")
            .into_response(),
    }
}

/// Lets the request through only when the principal holds an admin slot.
pub async fn ensure_admin(mut request: Request, next: Next) -> Response {
    let Some(user) = principal_of(&request) else {
        return FlashRedirect::to("/auth/login")
            .error("You must be logged in as an admin")
            .into_response();
    };

    if !user.role.is_admin() {
        tracing::warn!(
            "Non-admin {} ({}) denied {}",
            user.email,
            user.role,
            request.uri().path()
        );
        return FlashRedirect::to("/")
            .warning("You are not authorized to see this route")
            .into_response();
    }

    request.extensions_mut().insert(Principal(user));
    next.run(request).await
}

/// Keeps logged-in users away from the login and registration pages.
pub async fn ensure_not_authenticated(request: Request, next: Next) -> Response {
    if principal_of(&request).is_some() {
        return FlashRedirect::to("/").into_response();
    }
    next.run(request).await
}
