pub mod auth;
pub mod home;
pub mod jobs;
pub mod not_found;
pub mod system;
