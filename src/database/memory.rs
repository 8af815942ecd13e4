use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    Complaint, ComplaintStatus, ComplaintSummary, ComplaintWithOwner, NewComplaint, NewUser, Owner,
    Session, StatusFilter, User,
};
use super::{ComplaintStore, DatabaseError, SessionStore, Store, UserStore};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    /// Insertion order doubles as creation order.
    complaints: Vec<Complaint>,
    sessions: HashMap<Uuid, Session>,
}

impl Collections {
    fn join_owner(&self, complaint: &Complaint) -> ComplaintWithOwner {
        ComplaintWithOwner {
            complaint: complaint.clone(),
            owner: self.users.get(&complaint.user_id).map(Owner::from),
        }
    }
}

/// Process-local store for development and tests. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Inserts a complaint as-is, without requiring its owner to exist.
    pub async fn insert_raw_complaint(&self, complaint: Complaint) {
        self.inner.write().await.complaints.push(complaint);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate(user.email));
        }
        let user = user.into_user(Utc::now());
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    async fn insert_complaint(&self, complaint: NewComplaint) -> Result<Complaint, DatabaseError> {
        let complaint = complaint.into_complaint(Utc::now());
        self.inner.write().await.complaints.push(complaint.clone());
        Ok(complaint)
    }

    async fn complaints_by_owner(&self, user_id: Uuid) -> Result<Vec<ComplaintSummary>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner
            .complaints
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(ComplaintSummary::from)
            .collect())
    }

    async fn complaints_with_owner(
        &self,
        filter: StatusFilter,
    ) -> Result<Vec<ComplaintWithOwner>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner
            .complaints
            .iter()
            .filter(|c| filter.matches(c.status))
            .map(|c| inner.join_owner(c))
            .collect())
    }

    async fn find_complaint_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<ComplaintWithOwner>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner
            .complaints
            .iter()
            .find(|c| c.id == id)
            .map(|c| inner.join_owner(c)))
    }

    async fn set_complaint_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Complaint, DatabaseError> {
        let mut inner = self.inner.write().await;
        let complaint = inner
            .complaints
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("complaint {}", id)))?;
        complaint.status = status;
        complaint.updated_at = Utc::now();
        Ok(complaint.clone())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load_session(&self, id: Uuid) -> Result<Option<Session>, DatabaseError> {
        let mut inner = self.inner.write().await;
        let expired = match inner.sessions.get(&id) {
            Some(session) => session.is_expired(Utc::now()),
            None => return Ok(None),
        };
        if expired {
            inner.sessions.remove(&id);
            return Ok(None);
        }
        Ok(inner.sessions.get(&id).cloned())
    }

    /// Expired sessions are dropped on every write.
    async fn save_session(&self, session: &Session) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        inner.sessions.retain(|_, s| !s.is_expired(now));
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.inner.write().await.sessions.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
