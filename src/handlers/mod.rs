pub mod auth;
pub mod dashboard;
pub mod home;
pub mod public_profile;
pub mod settings;
