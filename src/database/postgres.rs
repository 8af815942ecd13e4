use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::models::{
    Complaint, ComplaintStatus, ComplaintSummary, ComplaintWithOwner, NewComplaint, NewUser,
    Session, StatusFilter, User,
};
use super::{ComplaintStore, DatabaseError, DatabaseManager, SessionStore, Store, UserStore};

const COMPLAINT_COLUMNS: &str = "c.id, c.title, c.description, c.room_no, c.mobile_no, c.roll_no, \
     c.status, c.user_id, c.created_at, c.updated_at";

const OWNER_COLUMNS: &str =
    "u.id AS owner_id, u.email AS owner_email, u.hostel_number AS owner_hostel_number";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let user = user.into_user(Utc::now());
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, hostel_number, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.hostel_number.0)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, &user.email))?;
        Ok(user)
    }
}

#[async_trait]
impl ComplaintStore for PgStore {
    async fn insert_complaint(&self, complaint: NewComplaint) -> Result<Complaint, DatabaseError> {
        let complaint = complaint.into_complaint(Utc::now());
        sqlx::query(
            r#"
            INSERT INTO complaints
                (id, title, description, room_no, mobile_no, roll_no, status, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(complaint.id)
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(&complaint.room_no)
        .bind(&complaint.mobile_no)
        .bind(&complaint.roll_no)
        .bind(complaint.status.as_str())
        .bind(complaint.user_id)
        .bind(complaint.created_at)
        .bind(complaint.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(complaint)
    }

    async fn complaints_by_owner(&self, user_id: Uuid) -> Result<Vec<ComplaintSummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, ComplaintSummary>(
            r#"
            SELECT id, title, description, status
            FROM complaints
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn complaints_with_owner(
        &self,
        filter: StatusFilter,
    ) -> Result<Vec<ComplaintWithOwner>, DatabaseError> {
        let condition = match filter {
            StatusFilter::Open => "c.status <> $1",
            StatusFilter::Resolved => "c.status = $1",
        };
        let sql = format!(
            "SELECT {COMPLAINT_COLUMNS}, {OWNER_COLUMNS} \
             FROM complaints c LEFT JOIN users u ON u.id = c.user_id \
             WHERE {condition} \
             ORDER BY c.created_at, c.id"
        );
        let rows = sqlx::query_as::<_, ComplaintWithOwner>(&sql)
            .bind(ComplaintStatus::Resolved.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_complaint_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<ComplaintWithOwner>, DatabaseError> {
        let sql = format!(
            "SELECT {COMPLAINT_COLUMNS}, {OWNER_COLUMNS} \
             FROM complaints c LEFT JOIN users u ON u.id = c.user_id \
             WHERE c.id = $1"
        );
        let row = sqlx::query_as::<_, ComplaintWithOwner>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_complaint_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Complaint, DatabaseError> {
        sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("complaint {}", id)))
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn load_session(&self, id: Uuid) -> Result<Option<Session>, DatabaseError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, flash, expires_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match session {
            Some(session) if session.is_expired(Utc::now()) => {
                self.delete_session(id).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Expired sessions are dropped on every write.
    async fn save_session(&self, session: &Session) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sessions WHERE expires_at < now()")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, flash, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                flash = EXCLUDED.flash,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(Json(&session.flash))
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
