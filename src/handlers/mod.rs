//! # HTTP Request Handlers Module
//!
//! actix-web 핸들러 함수들입니다. 핸들러는 요청을 꺼내 서비스에 넘기고
//! 결과를 공통 envelope(`ApiResponse`)로 감싸는 일만 합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Web, Mobile)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Middlewares - Bearer 인증, 차단, 역할 확인
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈)                           ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services (AppContext)                       ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - MongoDB / Redis
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 핸들러 작성 규칙
//!
//! - 서비스는 `web::Data<AppContext>`로 받습니다.
//! - 인증된 주체는 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser),
//!   활동 로그용 발신자 정보는 [`ClientInfo`](crate::domain::models::auth::ClientInfo) extractor로 받습니다.
//! - 반환 타입은 `Result<HttpResponse, AppError>`이고, 에러 응답 변환은 `AppError`의
//!   `ResponseError` 구현이 맡습니다.
//!
//! ```rust,ignore
//! #[get("/me")]
//! pub async fn get_me(
//!     context: web::Data<AppContext>,
//!     user: AuthenticatedUser,
//! ) -> Result<HttpResponse, AppError> {
//!     let profile = context.users.get_profile(&user.user_id).await?;
//!     Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
//! }
//! ```
//!
//! ## 모듈
//!
//! - [`auth`] - 가입, 로그인, 토큰 갱신, OTP (공개)
//! - [`users`] - 본인 계정 (Bearer 필수)
//! - [`admin`] - 차단/상태 관리 (ADMIN 전용)

pub mod admin;
pub mod auth;
pub mod users;
