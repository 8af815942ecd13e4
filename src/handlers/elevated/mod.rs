// handlers/elevated/mod.rs - Handlers behind `ensure_admin`
//
// The principal holds one of the four admin slots; what it may touch is
// further limited to its hostel by the complaint service.

pub mod admin;
pub mod complaints;

pub use admin::dashboard;
pub use complaints::{resolved_complaints, update_status};
