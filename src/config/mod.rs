use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub registration: RegistrationConfig,
    pub admins: AdminEmails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub name: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    pub ttl_secs: u64,
    pub cookie_name: String,
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    pub email_suffix: String,
    pub min_password_len: usize,
    pub min_hostel: i32,
    pub max_hostel: i32,
}

/// Admin email per hostel slot; index 0 is admin1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminEmails {
    pub slots: [Option<String>; 4],
}

impl AdminEmails {
    pub fn new(slots: [Option<&str>; 4]) -> Self {
        Self {
            slots: slots.map(|s| s.map(|e| e.trim().to_lowercase())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set outside development")]
    MissingSessionSecret,

    #[error("DATABASE_URL is required for the postgres store backend")]
    MissingDatabaseUrl,

    #[error("the memory store backend is not allowed in production")]
    MemoryStoreInProduction,
}

const DEV_SESSION_SECRET: &str = "development-session-secret";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.server.static_dir = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DB_NAME") {
            self.database.name = Some(v);
        }
        self.database.backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") => StoreBackend::Postgres,
            _ if self.database.url.is_some() => StoreBackend::Postgres,
            _ => self.database.backend,
        };
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("SESSION_TTL_SECS") {
            self.session.ttl_secs = v.parse().unwrap_or(self.session.ttl_secs);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.secure_cookie = v.parse().unwrap_or(self.session.secure_cookie);
        }

        // Registration overrides
        if let Ok(v) = env::var("REGISTRATION_EMAIL_SUFFIX") {
            self.registration.email_suffix = v.to_lowercase();
        }

        // Admin slots
        let slots = ["ADMIN1_EMAIL", "ADMIN2_EMAIL", "ADMIN3_EMAIL", "ADMIN4_EMAIL"]
            .map(|key| env::var(key).ok());
        self.admins = AdminEmails::new([
            slots[0].as_deref(),
            slots[1].as_deref(),
            slots[2].as_deref(),
            slots[3].as_deref(),
        ]);

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment != Environment::Development
            && (self.session.secret.is_empty() || self.session.secret == DEV_SESSION_SECRET)
        {
            return Err(ConfigError::MissingSessionSecret);
        }
        match self.database.backend {
            StoreBackend::Postgres if self.database.url.is_none() => {
                Err(ConfigError::MissingDatabaseUrl)
            }
            StoreBackend::Memory if self.environment == Environment::Production => {
                Err(ConfigError::MemoryStoreInProduction)
            }
            _ => Ok(()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                static_dir: "public".to_string(),
            },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                url: None,
                name: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            session: SessionConfig {
                secret: DEV_SESSION_SECRET.to_string(),
                ttl_secs: 60 * 60,
                cookie_name: "hostel_sid".to_string(),
                secure_cookie: false,
            },
            registration: RegistrationConfig::default(),
            admins: AdminEmails::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                name: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            session: SessionConfig {
                secret: String::new(),
                secure_cookie: true,
                ..Self::development().session
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                name: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            ..Self::staging()
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            email_suffix: "@lnmiit.ac.in".to_string(),
            min_password_len: 8,
            min_hostel: 1,
            max_hostel: 5,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
