// handlers/public/mod.rs - Pages reachable without a session
//
// Login and registration sit behind `ensure_not_authenticated`; everything
// else here is open to anyone.

pub mod auth;
pub mod home;

pub use home::{health, home, not_found};
