//! 아이덴티티 서비스 백엔드
//!
//! SaaS 앱을 위한 계정/인증 서비스입니다.
//!
//! # Features
//!
//! - **계정**: 이메일/사용자명/전화번호 기반 가입, 가입 이메일 인증, 전화번호 인증
//! - **로그인**: 비밀번호, multi-login, OTP 로그인
//! - **JWT**: HS256 access/refresh 토큰, 사용자 지문으로 비밀번호/역할 변경 시 무효화
//! - **OTP 원장**: `(식별자, 목적)`당 하나의 대기 코드, 만료/시도 제한, 비교 후 교체 검증
//! - **차단 게이트**: Redis 레지스트리 + 사용자 문서 플래그, 임시 차단 자동 해제
//! - **MongoDB**: 사용자, OTP, 활동 로그 저장
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /health, /api/v1/{auth,users,admin}
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Middlewares   │ ← Bearer 인증, 차단, 역할
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← web::Data<AppContext>
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │    Services     │ ◀── │      Jobs       │ ← OTP 정리, 차단 자동 해제
//! └─────────────────┘     └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 저장소 트레이트 (MongoDB / Redis 구현)
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use identity_service_backend::core::AppContext;
//! use identity_service_backend::routes::configure_all_routes;
//!
//! let context = AppContext::from_infrastructure(database, redis).await?;
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .app_data(web::Data::new(context.clone()))
//!         .configure(configure_all_routes)
//! });
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod jobs;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;
