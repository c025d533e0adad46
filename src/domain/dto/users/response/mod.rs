pub mod activity_response;
pub mod user_response;

pub use activity_response::ActivityResponse;
pub use user_response::UserResponse;
