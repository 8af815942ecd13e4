// handlers/public/auth/login.rs - GET/POST /auth/login

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::{FlashRedirect, RequestContext};
use crate::state::AppState;
use crate::views::{self, LoginTemplate, PageChrome};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_get(Extension(ctx): Extension<RequestContext>) -> Result<Html<String>, AppError> {
    views::render(&LoginTemplate {
        page: PageChrome::from_context(&ctx),
    })
}

/// Success rotates the session onto the user and lands on the home page.
/// Any failure goes back to the form with one generic message.
pub async fn login_post(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.users().login(&form.email, &form.password).await {
        Ok(user) => Ok(FlashRedirect::to("/").login(user.id).into_response()),
        Err(AppError::Authentication(message)) => {
            Ok(FlashRedirect::to("/auth/login").error(message).into_response())
        }
        Err(e) => Err(e),
    }
}
