//! Users Entity Module
//!
//! 자격 증명 저장소의 레코드인 [`user::User`]와 역할/상태 열거형을 정의합니다.

pub mod user;

pub use user::{Role, User, UserStatus};
