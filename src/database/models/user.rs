use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

/// Dormitory building a user lives in, and the scope of an admin slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostelNo(pub i32);

impl fmt::Display for HostelNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Moderator,
    Admin1,
    Admin2,
    Admin3,
    Admin4,
}

impl Role {
    /// Admin roles in slot order; slot N is bound to hostel N.
    pub const ADMIN_SLOTS: [Role; 4] = [Role::Admin1, Role::Admin2, Role::Admin3, Role::Admin4];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Moderator => "moderator",
            Role::Admin1 => "admin1",
            Role::Admin2 => "admin2",
            Role::Admin3 => "admin3",
            Role::Admin4 => "admin4",
        }
    }

    pub fn is_admin(&self) -> bool {
        Self::ADMIN_SLOTS.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "moderator" => Ok(Role::Moderator),
            "admin1" => Ok(Role::Admin1),
            "admin2" => Ok(Role::Admin2),
            "admin3" => Ok(Role::Admin3),
            "admin4" => Ok(Role::Admin4),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub hostel_number: HostelNo,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            hostel_number: HostelNo(row.try_get("hostel_number")?),
            role: role.parse().map_err(|e: UnknownRole| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// A user ready for insertion: email normalized, password already hashed
/// and role already assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub hostel_number: HostelNo,
    pub role: Role,
}

impl NewUser {
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: Uuid::new_v4(),
            email: self.email,
            password_hash: self.password_hash,
            hostel_number: self.hostel_number,
            role: self.role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The slice of a user joined onto complaints in admin listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub id: Uuid,
    pub email: String,
    pub hostel_number: HostelNo,
}

impl From<&User> for Owner {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            hostel_number: user.hostel_number,
        }
    }
}
