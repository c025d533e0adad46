//! 요청/응답 DTO
//!
//! - [`common`] - 공통 응답 envelope (`ApiResponse`, `ErrorBody`)
//! - [`auth`] - `/auth/*` 요청 바디와 토큰 응답
//! - [`users`] - 계정/관리자 요청과 프로필 응답

pub mod auth;
pub mod common;
pub mod users;

pub use common::{ApiResponse, ErrorBody};
