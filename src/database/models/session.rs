use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Warning,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
            FlashKind::Warning => "warning",
        }
    }
}

/// One-shot notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: FlashKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: FlashKind::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { kind: FlashKind::Warning, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub flash: Vec<Flash>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            flash: Vec::new(),
            expires_at: expiry_from_now(ttl_secs),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// A session with neither a principal nor pending flash carries nothing
    /// worth persisting.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.flash.is_empty()
    }

    pub fn touch(&mut self, ttl_secs: u64) {
        self.expires_at = expiry_from_now(ttl_secs);
    }
}

fn expiry_from_now(ttl_secs: u64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(ttl_secs as i64)
}

impl<'r> FromRow<'r, PgRow> for Session {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(flash): Json<Vec<Flash>> = row.try_get("flash")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            flash,
            expires_at: row.try_get("expires_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_empty_and_live() {
        let session = Session::new(3600);
        assert!(session.is_empty());
        assert!(!session.is_expired(Utc::now()));
        assert!(session.is_expired(Utc::now() + Duration::seconds(3601)));
    }

    #[test]
    fn flash_kinds_serialize_lowercase() {
        let json = serde_json::to_value(Flash::warning("careful")).unwrap();
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["message"], "careful");
    }
}
