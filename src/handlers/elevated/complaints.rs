// handlers/elevated/complaints.rs - GET /complaints/resolved, POST /complaints/update-status

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Extension, Form,
};

use crate::auth::resolve_hostel_for_role;
use crate::database::models::StatusFilter;
use crate::error::AppError;
use crate::middleware::{FlashRedirect, Principal, RequestContext};
use crate::services::StatusUpdateForm;
use crate::state::AppState;
use crate::views::{self, PageChrome, ResolvedComplaintsTemplate};

pub const STATUS_UPDATED: &str = "Complaint status updated successfully";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

pub async fn resolved_complaints(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(Principal(user)): Extension<Principal>,
) -> Result<Html<String>, AppError> {
    let rows = state
        .complaints()
        .list_for_admin(user.role, StatusFilter::Resolved)
        .await?;

    views::render(&ResolvedComplaintsTemplate {
        page: PageChrome::from_context(&ctx),
        hostel: resolve_hostel_for_role(user.role)
            .map(|h| h.to_string())
            .unwrap_or_default(),
        complaints: views::complaint_rows(&rows),
    })
}

/// Every outcome lands back on the open complaints list.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(Principal(user)): Extension<Principal>,
    Form(form): Form<StatusUpdateForm>,
) -> Response {
    let result = state.complaints().update_from_form(user.role, &form).await;

    let redirect = FlashRedirect::to("/complaints/all");
    match result {
        Ok(_) => redirect.success(STATUS_UPDATED),
        Err(AppError::Server(_)) => redirect.error(SOMETHING_WENT_WRONG),
        Err(e) => redirect.error(e.message()),
    }
    .into_response()
}
