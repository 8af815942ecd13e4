// handlers/protected/complaints.rs - /complaints/add, /complaints/my-complaints, /complaints/all

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Extension, Form,
};

use crate::auth::resolve_hostel_for_role;
use crate::database::models::StatusFilter;
use crate::error::AppError;
use crate::middleware::{FlashRedirect, Principal, RequestContext};
use crate::services::complaint_service::SUBMIT_FAILED;
use crate::services::ComplaintForm;
use crate::state::AppState;
use crate::views::{self, AddComplaintTemplate, AllComplaintsTemplate, MyComplaintsTemplate, PageChrome, SummaryRow};

pub const SUBMITTED: &str = "Complaint submitted successfully";

pub async fn add_complaint_get(
    Extension(ctx): Extension<RequestContext>,
) -> Result<Html<String>, AppError> {
    views::render(&AddComplaintTemplate {
        page: PageChrome::from_context(&ctx),
    })
}

pub async fn add_complaint_post(
    State(state): State<AppState>,
    Extension(Principal(user)): Extension<Principal>,
    Form(form): Form<ComplaintForm>,
) -> Response {
    match state.complaints().submit(&user, form).await {
        Ok(_) => FlashRedirect::to("/complaints/my-complaints")
            .success(SUBMITTED)
            .into_response(),
        Err(e) => {
            tracing::info!("Complaint from {} rejected: {}", user.email, e);
            FlashRedirect::to("/").error(SUBMIT_FAILED).into_response()
        }
    }
}

pub async fn my_complaints(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(Principal(user)): Extension<Principal>,
) -> Result<Html<String>, AppError> {
    let complaints = state.complaints().list_own(&user).await?;
    views::render(&MyComplaintsTemplate {
        page: PageChrome::from_context(&ctx),
        complaints: complaints.iter().map(SummaryRow::from).collect(),
    })
}

/// Open complaints of the admin's hostel. Only logged in is required to
/// reach it; the role is checked here.
pub async fn all_complaints(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(Principal(user)): Extension<Principal>,
) -> Result<Response, AppError> {
    let rows = match state
        .complaints()
        .list_for_admin(user.role, StatusFilter::Open)
        .await
    {
        Ok(rows) => rows,
        Err(AppError::Authorization(message)) => {
            tracing::warn!("{} ({}) denied open complaints", user.email, user.role);
            return Ok(FlashRedirect::to("/").error(message).into_response());
        }
        Err(e) => return Err(e),
    };

    let hostel = resolve_hostel_for_role(user.role)
        .map(|h| h.to_string())
        .unwrap_or_default();
    let page = AllComplaintsTemplate {
        page: PageChrome::from_context(&ctx),
        hostel,
        complaints: views::complaint_rows(&rows),
    };
    Ok(views::render(&page)?.into_response())
}
