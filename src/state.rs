use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseError, DatabaseManager, MemoryStore, PgStore, Store};
use crate::services::{ComplaintService, UserService};

/// Shared, cheaply cloneable handler state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Opens the configured backend; the Postgres schema is created on the way.
    pub async fn connect(config: AppConfig) -> Result<Self, DatabaseError> {
        let store: Arc<dyn Store> = match config.database.backend {
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                DatabaseManager::ensure_schema(&pool).await?;
                Arc::new(PgStore::new(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(config, store))
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.store.clone(), self.config.clone())
    }

    pub fn complaints(&self) -> ComplaintService {
        ComplaintService::new(self.store.clone())
    }
}
