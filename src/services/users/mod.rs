//! 계정 관리 서비스 모듈
//!
//! 프로필 조회, 상태 변경, 탈퇴(비활성화)를 제공합니다.

pub mod user_service;

pub use user_service::UserService;
