// handlers/elevated/admin.rs - GET /admin

use axum::{extract::State, response::Html, Extension};

use crate::auth::resolve_hostel_for_role;
use crate::database::models::StatusFilter;
use crate::error::AppError;
use crate::middleware::{Principal, RequestContext};
use crate::services::complaint_service::UNAUTHORIZED_ACCESS;
use crate::state::AppState;
use crate::views::{self, AdminDashboardTemplate, PageChrome};

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(Principal(user)): Extension<Principal>,
) -> Result<Html<String>, AppError> {
    let hostel = resolve_hostel_for_role(user.role)
        .ok_or_else(|| AppError::authorization(UNAUTHORIZED_ACCESS))?;

    let complaints = state.complaints();
    let open = complaints.list_for_admin(user.role, StatusFilter::Open).await?;
    let resolved = complaints
        .list_for_admin(user.role, StatusFilter::Resolved)
        .await?;

    views::render(&AdminDashboardTemplate::new(
        PageChrome::from_context(&ctx),
        user.role,
        hostel,
        open.len(),
        resolved.len(),
    ))
}
