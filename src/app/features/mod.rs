pub mod auth;
pub mod invites;
pub mod organization;
pub mod reports;
pub mod status;
