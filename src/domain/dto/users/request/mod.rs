pub mod account_request;

pub use account_request::{
    ActivityQuery, BlockUserRequest, ChangePasswordRequest, UpdateProfileRequest, UpdateStatusRequest,
    VerifyPhoneRequest,
};
