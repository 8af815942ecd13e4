pub mod complaint_service;
pub mod user_service;

pub use complaint_service::{ComplaintForm, ComplaintService, StatusUpdateForm};
pub use user_service::{create_user, RegistrationForm, UserService};
