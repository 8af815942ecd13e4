//! Role → hostel authorization.
//!
//! Admin slot N may see and act on complaints whose owner lives in hostel
//! N, and nothing else. Every listing and mutation path goes through
//! `can_access`.

use crate::database::models::{HostelNo, Role};

/// The hostel an admin role is bound to; `None` for non-admin roles.
pub fn resolve_hostel_for_role(role: Role) -> Option<HostelNo> {
    match role {
        Role::Admin1 => Some(HostelNo(1)),
        Role::Admin2 => Some(HostelNo(2)),
        Role::Admin3 => Some(HostelNo(3)),
        Role::Admin4 => Some(HostelNo(4)),
        Role::Client | Role::Moderator => None,
    }
}

/// `owner_hostel` is `None` when the owner could not be loaded, which
/// never grants access.
pub fn can_access(role: Role, owner_hostel: Option<HostelNo>) -> bool {
    match (resolve_hostel_for_role(role), owner_hostel) {
        (Some(assigned), Some(owner)) => assigned == owner,
        _ => false,
    }
}
