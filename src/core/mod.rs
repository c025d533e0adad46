//! # Core Module
//!
//! 서비스 전반에서 공유하는 기반 요소입니다.
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현으로 공통 envelope 응답
//! - **ErrorContext**: 외부 에러를 `InternalError`로 감싸는 확장 trait
//!
//! ### [`context`] - 서비스 조립
//! - **AppContext**: 시작 시 한 번 생성되어 `web::Data`로 공유되는 서비스 묶음
//!
//! ```rust,ignore
//! let context = AppContext::from_infrastructure(database, redis).await?;
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .app_data(web::Data::new(context.clone()))
//!         .configure(configure_all_routes)
//! })
//! ```

pub mod context;
pub mod errors;

pub use context::AppContext;
pub use errors::{AppError, AppResult, ErrorContext};
