//! # Domain Models Module
//!
//! 저장되지 않는 도메인 값 객체들입니다.
//!
//! - [`auth`] - 인증된 주체, 인증 모드/역할 요구사항, 요청자 정보
//! - [`token`] - JWT 클레임과 토큰 쌍
//! - [`identifier`] - 이메일/전화번호 식별자 분류와 정규화

pub mod auth;
pub mod identifier;
pub mod token;

pub use auth::{AuthMode, AuthenticatedUser, ClientInfo, RequiredRole};
pub use identifier::{Identifier, IdentifierKind};
pub use token::{TokenClaims, TokenPair, TokenType};
