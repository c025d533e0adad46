pub mod blocked_user;

pub use blocked_user::BlockedUser;
