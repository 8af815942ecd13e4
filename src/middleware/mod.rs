pub mod guard;
pub mod response;
pub mod session;

pub use guard::{ensure_admin, ensure_authenticated, ensure_not_authenticated, Principal};
pub use response::{AuthChange, FlashRedirect, SessionEffects};
pub use session::{session_middleware, RequestContext};
