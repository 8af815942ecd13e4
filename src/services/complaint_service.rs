use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{can_access, resolve_hostel_for_role};
use crate::database::models::{
    Complaint, ComplaintStatus, ComplaintSummary, ComplaintWithOwner, NewComplaint, Role,
    StatusFilter, User,
};
use crate::database::{ComplaintStore, Store};
use crate::error::AppError;

pub const SUBMIT_FAILED: &str = "Failed to submit complaint";
pub const COMPLAINT_NOT_FOUND: &str = "Complaint not found";
pub const UNAUTHORIZED_ACCESS: &str = "Unauthorized Access";
pub const UNAUTHORIZED_UPDATE: &str = "Unauthorized to update this complaint";
pub const INVALID_STATUS: &str = "Invalid complaint status";

/// Complaint form as posted by the browser. Missing fields deserialize to
/// `None` and fail validation instead of the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintForm {
    #[serde(default, rename = "roomNo")]
    pub room_no: Option<String>,
    #[serde(default, rename = "mobileNo")]
    pub mobile_no: Option<String>,
    #[serde(default, rename = "rollNo")]
    pub roll_no: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateForm {
    #[serde(default, rename = "complaintId")]
    pub complaint_id: String,
    #[serde(default)]
    pub status: String,
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ComplaintForm {
    fn into_new_complaint(self, owner: Uuid) -> Result<NewComplaint, AppError> {
        let fields = (
            required(&self.room_no),
            required(&self.mobile_no),
            required(&self.roll_no),
            required(&self.title),
            required(&self.description),
        );
        match fields {
            (Some(room_no), Some(mobile_no), Some(roll_no), Some(title), Some(description)) => {
                Ok(NewComplaint {
                    title,
                    description,
                    room_no,
                    mobile_no,
                    roll_no,
                    user_id: owner,
                })
            }
            _ => Err(AppError::validation(SUBMIT_FAILED)),
        }
    }
}

impl StatusUpdateForm {
    /// An id that does not parse names no complaint.
    pub fn complaint_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(self.complaint_id.trim()).map_err(|_| AppError::not_found(COMPLAINT_NOT_FOUND))
    }

    pub fn status(&self) -> Result<ComplaintStatus, AppError> {
        self.status
            .trim()
            .parse::<ComplaintStatus>()
            .map_err(|_| AppError::validation(INVALID_STATUS))
    }
}

pub struct ComplaintService {
    store: Arc<dyn Store>,
}

impl ComplaintService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Files a new pending complaint owned by `user`.
    pub async fn submit(&self, user: &User, form: ComplaintForm) -> Result<Complaint, AppError> {
        let new_complaint = form.into_new_complaint(user.id)?;
        let complaint = self.store.insert_complaint(new_complaint).await?;
        tracing::info!(
            "Complaint {} submitted by {} (hostel {})",
            complaint.id,
            user.email,
            user.hostel_number
        );
        Ok(complaint)
    }

    pub async fn list_own(&self, user: &User) -> Result<Vec<ComplaintSummary>, AppError> {
        Ok(self.store.complaints_by_owner(user.id).await?)
    }

    /// Complaints matching `filter` whose owner lives in the admin's hostel.
    /// Complaints whose owner is gone are dropped.
    pub async fn list_for_admin(
        &self,
        role: Role,
        filter: StatusFilter,
    ) -> Result<Vec<ComplaintWithOwner>, AppError> {
        if resolve_hostel_for_role(role).is_none() {
            return Err(AppError::authorization(UNAUTHORIZED_ACCESS));
        }

        let rows = self.store.complaints_with_owner(filter).await?;
        Ok(rows
            .into_iter()
            .filter(|row| can_access(role, row.owner.as_ref().map(|o| o.hostel_number)))
            .collect())
    }

    pub async fn update_status(
        &self,
        role: Role,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Complaint, AppError> {
        let row = self.updatable(role, id).await?;
        self.apply_status(role, row, status).await
    }

    /// Same checks as `update_status`, with the raw form values. The status
    /// is only validated once the complaint is known to exist and be in reach.
    pub async fn update_from_form(
        &self,
        role: Role,
        form: &StatusUpdateForm,
    ) -> Result<Complaint, AppError> {
        let row = self.updatable(role, form.complaint_id()?).await?;
        let status = form.status()?;
        self.apply_status(role, row, status).await
    }

    /// Existence, then admin role, then hostel match.
    async fn updatable(&self, role: Role, id: Uuid) -> Result<ComplaintWithOwner, AppError> {
        let row = self
            .store
            .find_complaint_with_owner(id)
            .await?
            .ok_or_else(|| AppError::not_found(COMPLAINT_NOT_FOUND))?;

        if resolve_hostel_for_role(role).is_none() {
            tracing::warn!("Role {} tried to update complaint {}", role, id);
            return Err(AppError::authorization(UNAUTHORIZED_ACCESS));
        }

        let owner_hostel = row.owner.as_ref().map(|o| o.hostel_number);
        if !can_access(role, owner_hostel) {
            tracing::warn!(
                "{} denied update of complaint {} (owner hostel {:?})",
                role,
                id,
                owner_hostel.map(|h| h.0)
            );
            return Err(AppError::authorization(UNAUTHORIZED_UPDATE));
        }
        Ok(row)
    }

    async fn apply_status(
        &self,
        role: Role,
        row: ComplaintWithOwner,
        status: ComplaintStatus,
    ) -> Result<Complaint, AppError> {
        let id = row.complaint.id;
        let updated = self.store.set_complaint_status(id, status).await?;
        tracing::info!(
            "Complaint {} moved {} -> {} by {}",
            id,
            row.complaint.status,
            updated.status,
            role
        );
        Ok(updated)
    }
}
