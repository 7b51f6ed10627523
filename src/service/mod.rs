pub mod accounts;
pub mod links;
pub mod profiles;
pub mod validation;

pub use accounts::{AccountService, SessionLookup};
pub use links::LinkService;
pub use profiles::ProfileService;
