pub mod email;
pub mod organization_id;
pub mod organization_role;
pub mod password;
pub mod user_id;

pub use email::Email;
pub use organization_id::{OrganizationId, OrganizationRef};
pub use organization_role::{GlobalRole, OrganizationRole, RequiredRole};
pub use password::{HashedPassword, Password};
pub use user_id::UserId;
