//! Persistence ports and their implementations.
//!
//! Handlers and services only see the `Store` trait object; `PgStore` backs
//! it with Postgres, `MemoryStore` with process memory.

use async_trait::async_trait;
use uuid::Uuid;

pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use models::{
    Complaint, ComplaintStatus, ComplaintSummary, ComplaintWithOwner, NewComplaint, NewUser,
    Session, StatusFilter, User,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` must already be normalized (trimmed, lowercase).
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    /// Fails with `DatabaseError::Duplicate` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
}

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn insert_complaint(&self, complaint: NewComplaint) -> Result<Complaint, DatabaseError>;
    /// Complaints owned by `user_id`, oldest first.
    async fn complaints_by_owner(&self, user_id: Uuid) -> Result<Vec<ComplaintSummary>, DatabaseError>;
    /// Complaints matching `filter`, oldest first, each left-joined to its owner.
    async fn complaints_with_owner(
        &self,
        filter: StatusFilter,
    ) -> Result<Vec<ComplaintWithOwner>, DatabaseError>;
    async fn find_complaint_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<ComplaintWithOwner>, DatabaseError>;
    /// Fails with `DatabaseError::NotFound` when the complaint is gone.
    async fn set_complaint_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Complaint, DatabaseError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Expired sessions are treated as missing.
    async fn load_session(&self, id: Uuid) -> Result<Option<Session>, DatabaseError>;
    /// Insert or replace.
    async fn save_session(&self, session: &Session) -> Result<(), DatabaseError>;
    async fn delete_session(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait Store: UserStore + ComplaintStore + SessionStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
