//! # Domain Layer
//!
//! ```text
//! domain/
//! ├── entities/  ← 저장소에 기록되는 레코드
//! ├── models/    ← 토큰 클레임, 인증 주체, 식별자 같은 값 객체
//! └── dto/       ← HTTP 요청/응답 바디
//! ```

pub mod dto;
pub mod entities;
pub mod models;
