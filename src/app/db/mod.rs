pub mod members;
pub mod organization_invites;
pub mod organization_reports;
pub mod organizations;
pub mod sessions;
pub mod users;
