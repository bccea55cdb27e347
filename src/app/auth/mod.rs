pub mod authorize;
pub mod identity;
pub mod middleware;
pub mod token;

pub use identity::CallerIdentity;
pub use token::{ExternalLogin, TokenDescriptor};
