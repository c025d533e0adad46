//! # Domain Entities Module
//!
//! 저장소에 그대로 기록되는 도메인 레코드들입니다.
//!
//! ```text
//! entities/
//! ├── users/       ← User (자격 증명 저장소, MongoDB `users`)
//! ├── otps/        ← OtpVerification (OTP 원장, MongoDB `otps`)
//! ├── activities/  ← UserActivity (감사 로그, MongoDB `user_activities`)
//! └── blocks/      ← BlockedUser (차단 레지스트리, Redis `blocked_users:*`)
//! ```
//!
//! MongoDB 문서는 `_id`를 `ObjectId`로, 시각을 `bson::DateTime`으로 보관합니다.
//! Redis에 JSON으로만 저장되는 차단 레코드는 `chrono` 시각을 사용합니다.

pub mod activities;
pub mod blocks;
pub mod otps;
pub mod users;

pub use activities::{ActivityAction, UserActivity};
pub use blocks::BlockedUser;
pub use otps::{OtpPurpose, OtpVerification};
pub use users::{Role, User, UserStatus};
