use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use super::user::Owner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown complaint status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ComplaintStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ComplaintStatus::Pending),
            "Resolved" => Ok(ComplaintStatus::Resolved),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Which slice of complaints an admin listing looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Everything not yet resolved.
    Open,
    Resolved,
}

impl StatusFilter {
    pub fn matches(&self, status: ComplaintStatus) -> bool {
        match self {
            StatusFilter::Open => status != ComplaintStatus::Resolved,
            StatusFilter::Resolved => status == ComplaintStatus::Resolved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub room_no: String,
    pub mobile_no: String,
    pub roll_no: String,
    pub status: ComplaintStatus,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn decode_status(row: &PgRow) -> Result<ComplaintStatus, sqlx::Error> {
    let status: String = row.try_get("status")?;
    status.parse().map_err(|e: UnknownStatus| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Complaint {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            room_no: row.try_get("room_no")?,
            mobile_no: row.try_get("mobile_no")?,
            roll_no: row.try_get("roll_no")?,
            status: decode_status(row)?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub room_no: String,
    pub mobile_no: String,
    pub roll_no: String,
    pub user_id: Uuid,
}

impl NewComplaint {
    /// New complaints always start out pending.
    pub fn into_complaint(self, now: DateTime<Utc>) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            room_no: self.room_no,
            mobile_no: self.mobile_no,
            roll_no: self.roll_no,
            status: ComplaintStatus::Pending,
            user_id: self.user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owner-facing projection; room and contact details stay out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
}

impl From<&Complaint> for ComplaintSummary {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            description: c.description.clone(),
            status: c.status,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for ComplaintSummary {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: decode_status(row)?,
        })
    }
}

/// A complaint left-joined to its owner. `owner` is `None` when the
/// referenced user does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintWithOwner {
    pub complaint: Complaint,
    pub owner: Option<Owner>,
}

impl<'r> FromRow<'r, PgRow> for ComplaintWithOwner {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let complaint = Complaint::from_row(row)?;
        let owner_id: Option<Uuid> = row.try_get("owner_id")?;
        let owner = match owner_id {
            Some(id) => Some(Owner {
                id,
                email: row.try_get("owner_email")?,
                hostel_number: super::user::HostelNo(row.try_get("owner_hostel_number")?),
            }),
            None => None,
        };
        Ok(Self { complaint, owner })
    }
}
