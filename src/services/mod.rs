//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 시작 시 한 번 생성되어 [`crate::core::context::AppContext`]를 통해
//! 핸들러와 미들웨어에 전달됩니다. 저장소와 외부 게이트웨이는 trait 객체로 주입받으므로
//! 테스트에서는 메모리 구현으로 바꿔 끼울 수 있습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! let context = AppContext::from_infrastructure(database, redis).await?;
//! let tokens = context.identity.login(request, &client).await?;
//! ```

pub mod activity;
pub mod auth;
pub mod blocks;
pub mod notifications;
pub mod otp;
pub mod users;
