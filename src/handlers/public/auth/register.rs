// handlers/public/auth/register.rs - GET/POST /auth/register

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Form,
};

use crate::database::models::Flash;
use crate::error::AppError;
use crate::middleware::{FlashRedirect, RequestContext};
use crate::services::user_service::{email_error, normalize_email};
use crate::services::RegistrationForm;
use crate::state::AppState;
use crate::views::{self, PageChrome, RegisterTemplate};

pub const REGISTERED: &str = "Successfully registered! Please Log in...";

pub async fn register_get(
    Extension(ctx): Extension<RequestContext>,
) -> Result<Html<String>, AppError> {
    views::render(&RegisterTemplate {
        page: PageChrome::from_context(&ctx),
        email: String::new(),
        hostel_number: String::new(),
    })
}

pub async fn register_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    match state.users().register(&form).await {
        Ok(_) => Ok(FlashRedirect::to("/auth/login").success(REGISTERED).into_response()),
        Err(AppError::Conflict(message)) => {
            Ok(FlashRedirect::to("/auth/register").error(message).into_response())
        }
        Err(AppError::Validation(messages)) => {
            // The form comes back with the email only when it was acceptable.
            let email = normalize_email(&form.email);
            let email = match email_error(&email, &state.config.registration) {
                None => email,
                Some(_) => String::new(),
            };
            let flashes: Vec<Flash> = messages.into_iter().map(Flash::error).collect();
            let page = RegisterTemplate {
                page: PageChrome::from_context(&ctx).with_messages(&flashes),
                email,
                hostel_number: form.hostel_number.trim().to_string(),
            };
            Ok((StatusCode::BAD_REQUEST, views::render(&page)?).into_response())
        }
        Err(e) => Err(e),
    }
}
