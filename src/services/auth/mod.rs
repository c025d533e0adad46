//! 인증 서비스 모듈
//!
//! - [`token_service`] - HS256 access/refresh 토큰 발급과 검증
//! - [`password_hasher`] - bcrypt 해싱
//! - [`identity_service`] - 가입, 로그인, 비밀번호/인증 코드 흐름 조립

pub mod identity_service;
pub mod password_hasher;
pub mod token_service;

pub use identity_service::IdentityService;
pub use password_hasher::PasswordHasher;
pub use token_service::{TokenService, TokenSettings};
