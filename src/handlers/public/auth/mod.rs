// handlers/public/auth/mod.rs - Session acquisition
//
// GET renders the form, POST processes it. Both routes are only reachable
// by anonymous sessions.

pub mod login;
pub mod register;

pub use login::{login_get, login_post, LoginForm};
pub use register::{register_get, register_post};
