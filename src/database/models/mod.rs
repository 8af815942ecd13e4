pub mod complaint;
pub mod session;
pub mod user;

pub use complaint::{
    Complaint, ComplaintStatus, ComplaintSummary, ComplaintWithOwner, NewComplaint, StatusFilter,
};
pub use session::{Flash, FlashKind, Session};
pub use user::{HostelNo, NewUser, Owner, Role, User};
