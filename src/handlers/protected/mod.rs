// handlers/protected/mod.rs - Handlers behind `ensure_authenticated`
//
// Every handler here can rely on a `Principal` extension being present.

pub mod auth;
pub mod complaints;
pub mod user;

pub use auth::logout;
pub use complaints::{add_complaint_get, add_complaint_post, all_complaints, my_complaints};
pub use user::profile;
