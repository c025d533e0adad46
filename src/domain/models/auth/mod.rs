pub mod authenticated_user;
pub mod authentication_request;
pub mod client_info;

pub use authenticated_user::AuthenticatedUser;
pub use authentication_request::{AuthMode, RequiredRole};
pub use client_info::ClientInfo;
