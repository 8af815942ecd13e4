use std::sync::Arc;

use serde::Deserialize;

use crate::auth::{hash_password, verify_password, PasswordError};
use crate::config::{AdminEmails, AppConfig, RegistrationConfig};
use crate::database::models::{HostelNo, NewUser, Role, User};
use crate::database::{DatabaseError, Store, UserStore};
use crate::error::AppError;

pub const EMAIL_EXISTS: &str = "Email already exists";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Raw registration form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default, rename = "hostelNumber")]
    pub hostel_number: String,
}

/// Registration fields that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub email: String,
    pub password: String,
    pub hostel_number: HostelNo,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// The email rule that fails for `email` (already normalized), if any.
pub fn email_error(email: &str, rules: &RegistrationConfig) -> Option<String> {
    if !looks_like_email(email) {
        return Some("Email must be a valid email".to_string());
    }
    if !email.ends_with(&rules.email_suffix) {
        return Some(format!("Email must end with {}", rules.email_suffix));
    }
    None
}

/// Checks every registration rule, reporting all failures at once.
pub fn validate_registration(
    form: &RegistrationForm,
    rules: &RegistrationConfig,
) -> Result<ValidRegistration, Vec<String>> {
    let mut errors = Vec::new();

    let email = normalize_email(&form.email);
    if let Some(e) = email_error(&email, rules) {
        errors.push(e);
    }

    let password = form.password.trim();
    if password.chars().count() < rules.min_password_len {
        errors.push(format!(
            "Password should be of minimum length {}",
            rules.min_password_len
        ));
    }
    if form.password2.trim() != password {
        errors.push("Passwords do not match".to_string());
    }

    let hostel = form
        .hostel_number
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|n| (rules.min_hostel..=rules.max_hostel).contains(n));
    if hostel.is_none() {
        errors.push(format!(
            "Hostel number must be between {} and {}",
            rules.min_hostel, rules.max_hostel
        ));
    }

    match hostel {
        Some(n) if errors.is_empty() => Ok(ValidRegistration {
            email,
            password: password.to_string(),
            hostel_number: HostelNo(n),
        }),
        _ => Err(errors),
    }
}

/// Role a freshly registered email gets: the admin slot whose configured
/// email matches (highest slot wins), otherwise client.
pub fn role_for_email(email: &str, admins: &AdminEmails) -> Role {
    admins
        .slots
        .iter()
        .zip(Role::ADMIN_SLOTS)
        .filter(|(slot, _)| slot.as_deref() == Some(email))
        .map(|(_, role)| role)
        .last()
        .unwrap_or_default()
}

/// Builds the user to persist: hashes the password and assigns the role.
pub fn create_user(fields: ValidRegistration, admins: &AdminEmails) -> Result<NewUser, PasswordError> {
    Ok(NewUser {
        role: role_for_email(&fields.email, admins),
        password_hash: hash_password(&fields.password)?,
        email: fields.email,
        hostel_number: fields.hostel_number,
    })
}

pub struct UserService {
    store: Arc<dyn Store>,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<User, AppError> {
        let fields =
            validate_registration(form, &self.config.registration).map_err(AppError::Validation)?;

        if self.store.find_user_by_email(&fields.email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_EXISTS));
        }

        let new_user = create_user(fields, &self.config.admins)?;
        let user = self.store.insert_user(new_user).await.map_err(|e| match e {
            DatabaseError::Duplicate(_) => AppError::conflict(EMAIL_EXISTS),
            other => other.into(),
        })?;

        tracing::info!(
            "Registered {} (hostel {}, role {})",
            user.email,
            user.hostel_number,
            user.role
        );
        Ok(user)
    }

    /// Never says which of email or password was wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .filter(|user| verify_password(password.trim(), &user.password_hash));

        match user {
            Some(user) => {
                tracing::info!("{} logged in", user.email);
                Ok(user)
            }
            None => {
                tracing::info!("Failed login for {}", email);
                Err(AppError::authentication(INVALID_CREDENTIALS))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn form(email: &str, password: &str, password2: &str, hostel: &str) -> RegistrationForm {
        RegistrationForm {
            email: email.to_string(),
            password: password.to_string(),
            password2: password2.to_string(),
            hostel_number: hostel.to_string(),
        }
    }

    fn service_with_admins(admins: AdminEmails) -> (Arc<MemoryStore>, UserService) {
        let store = Arc::new(MemoryStore::new());
        let mut config = AppConfig::development();
        config.admins = admins;
        let service = UserService::new(store.clone(), Arc::new(config));
        (store, service)
    }

    #[test]
    fn valid_form_is_normalized() {
        let rules = RegistrationConfig::default();
        let valid = validate_registration(
            &form("  Student@LNMIIT.ac.in ", " password123 ", "password123", "3"),
            &rules,
        )
        .unwrap();
        assert_eq!(valid.email, "student@lnmiit.ac.in");
        assert_eq!(valid.password, "password123");
        assert_eq!(valid.hostel_number, HostelNo(3));
    }

    #[test]
    fn foreign_domain_is_rejected() {
        let rules = RegistrationConfig::default();
        let errors =
            validate_registration(&form("student@gmail.com", "password123", "password123", "1"), &rules)
                .unwrap_err();
        assert_eq!(errors, vec!["Email must end with @lnmiit.ac.in"]);
    }

    #[test]
    fn every_failing_rule_is_reported() {
        let rules = RegistrationConfig::default();
        let errors = validate_registration(&form("nope", "short", "other", "9"), &rules).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Email must be a valid email",
                "Password should be of minimum length 8",
                "Passwords do not match",
                "Hostel number must be between 1 and 5",
            ]
        );
    }

    #[test]
    fn hostel_bounds_are_inclusive() {
        let rules = RegistrationConfig::default();
        for hostel in ["1", "5"] {
            assert!(validate_registration(&form("a@lnmiit.ac.in", "password123", "password123", hostel), &rules).is_ok());
        }
        for hostel in ["0", "6", "two", ""] {
            assert!(validate_registration(&form("a@lnmiit.ac.in", "password123", "password123", hostel), &rules).is_err());
        }
    }

    #[test]
    fn admin_slot_email_gets_slot_role() {
        let admins = AdminEmails::new([None, Some("warden2@lnmiit.ac.in"), None, None]);
        assert_eq!(role_for_email("warden2@lnmiit.ac.in", &admins), Role::Admin2);
        assert_eq!(role_for_email("student@lnmiit.ac.in", &admins), Role::Client);
    }

    #[test]
    fn later_slot_wins_on_shared_email() {
        let admins = AdminEmails::new([Some("w@lnmiit.ac.in"), None, Some("w@lnmiit.ac.in"), None]);
        assert_eq!(role_for_email("w@lnmiit.ac.in", &admins), Role::Admin3);
    }

    #[test]
    fn create_user_hashes_password() {
        let user = create_user(
            ValidRegistration {
                email: "a@lnmiit.ac.in".to_string(),
                password: "password123".to_string(),
                hostel_number: HostelNo(1),
            },
            &AdminEmails::default(),
        )
        .unwrap();
        assert_ne!(user.password_hash, "password123");
        assert!(verify_password("password123", &user.password_hash));
        assert_eq!(user.role, Role::Client);
    }

    #[tokio::test]
    async fn register_then_login() {
        let admins = AdminEmails::new([None, None, None, Some("warden4@lnmiit.ac.in")]);
        let (_, service) = service_with_admins(admins);

        let user = service
            .register(&form("Warden4@lnmiit.ac.in", "password123", "password123", "4"))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin4);

        let logged_in = service.login(" WARDEN4@lnmiit.ac.in", "password123").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn invalid_registration_creates_nobody() {
        let (store, service) = service_with_admins(AdminEmails::default());
        let err = service
            .register(&form("student@example.com", "password123", "password123", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_one_user() {
        let (store, service) = service_with_admins(AdminEmails::default());
        let f = form("student@lnmiit.ac.in", "password123", "password123", "2");
        service.register(&f).await.unwrap();

        let err = service.register(&f).await.unwrap_err();
        assert!(matches!(&err, AppError::Conflict(msg) if msg == EMAIL_EXISTS));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (_, service) = service_with_admins(AdminEmails::default());
        service
            .register(&form("student@lnmiit.ac.in", "password123", "password123", "2"))
            .await
            .unwrap();

        let wrong_password = service.login("student@lnmiit.ac.in", "password124").await.unwrap_err();
        let unknown_email = service.login("ghost@lnmiit.ac.in", "password123").await.unwrap_err();
        assert_eq!(wrong_password.message(), INVALID_CREDENTIALS);
        assert_eq!(unknown_email.message(), INVALID_CREDENTIALS);
    }
}
