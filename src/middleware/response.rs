use axum::response::{IntoResponse, Redirect, Response};
use uuid::Uuid;

use crate::database::models::Flash;

/// Principal change requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChange {
    Login(Uuid),
    Logout,
}

/// Session writes a handler asks for. Attached to the response as an
/// extension and applied by the session middleware once the handler is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEffects {
    pub flash: Vec<Flash>,
    pub auth: Option<AuthChange>,
}

/// `303 See Other` that carries flash messages (and optionally a login or
/// logout) to the next request.
#[derive(Debug)]
pub struct FlashRedirect {
    to: String,
    effects: SessionEffects,
}

impl FlashRedirect {
    pub fn to(uri: impl Into<String>) -> Self {
        Self {
            to: uri.into(),
            effects: SessionEffects::default(),
        }
    }

    pub fn flash(mut self, flash: Flash) -> Self {
        self.effects.flash.push(flash);
        self
    }

    pub fn success(self, message: impl Into<String>) -> Self {
        self.flash(Flash::success(message))
    }

    pub fn error(self, message: impl Into<String>) -> Self {
        self.flash(Flash::error(message))
    }

    pub fn warning(self, message: impl Into<String>) -> Self {
        self.flash(Flash::warning(message))
    }

    pub fn login(mut self, user_id: Uuid) -> Self {
        self.effects.auth = Some(AuthChange::Login(user_id));
        self
    }

    pub fn logout(mut self) -> Self {
        self.effects.auth = Some(AuthChange::Logout);
        self
    }

    pub fn location(&self) -> &str {
        &self.to
    }

    pub fn effects(&self) -> &SessionEffects {
        &self.effects
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut response = Redirect::to(&self.to).into_response();
        if self.effects != SessionEffects::default() {
            response.extensions_mut().insert(self.effects);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn redirect_carries_effects() {
        let user_id = Uuid::new_v4();
        let response = FlashRedirect::to("/")
            .success("Welcome")
            .login(user_id)
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let effects = response.extensions().get::<SessionEffects>().unwrap();
        assert_eq!(effects.flash, vec![Flash::success("Welcome")]);
        assert_eq!(effects.auth, Some(AuthChange::Login(user_id)));
    }

    #[test]
    fn plain_redirect_has_no_effects() {
        let response = FlashRedirect::to("/auth/login").into_response();
        assert!(response.extensions().get::<SessionEffects>().is_none());
    }
}
