//! 미들웨어 모듈
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer access 토큰 검증 (서명, 만료, 용도, 사용자 지문)
//! - 계정 상태와 차단 게이트 확인
//! - 역할 요구사항 확인
//! - 인증된 사용자를 request extension에 저장
//!
//! ```rust,ignore
//! App::new()
//!     .service(
//!         web::scope("/users")
//!             .wrap(AuthMiddleware::required())
//!             .service(handlers::users::me)
//!     )
//!     .service(
//!         web::scope("/admin")
//!             .wrap(AuthMiddleware::admin())
//!             .service(handlers::admin::block_user)
//!     )
//! ```

mod auth_inner;
pub mod auth_middleware;

pub use auth_middleware::AuthMiddleware;
