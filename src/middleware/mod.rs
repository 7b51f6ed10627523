pub mod extract;
pub mod session;

pub use extract::{ApiJson, ApiPath};
pub use session::{RequireAccount, SESSION_COOKIE, SessionGate};
