// handlers/mod.rs - Three handler tiers, by the guard in front of them
//
// Public (no session required) → Protected (logged in) → Elevated (admin slot)

pub mod elevated; // /admin, /complaints/resolved, /complaints/update-status
pub mod protected; // /complaints/*, /user/*, /auth/logout
pub mod public; // /, /health, /auth/login, /auth/register
