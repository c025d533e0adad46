//! API 라우트 설정 모듈
//!
//! 엔드포인트를 보안 레벨별 스코프로 묶어 등록합니다.
//!
//! | Scope | 미들웨어 | 핸들러 |
//! |-------|----------|--------|
//! | `/health` | 없음 | 헬스체크 |
//! | `/api/v1/auth` | 없음 | [`handlers::auth`] |
//! | `/api/v1/users` | `AuthMiddleware::required()` | [`handlers::users`] |
//! | `/api/v1/admin` | `AuthMiddleware::admin()` | [`handlers::admin`] |
//!
//! ```rust,ignore
//! use actix_web::App;
//!
//! let app = App::new()
//!     .app_data(web::Data::new(context))
//!     .configure(configure_all_routes);
//! ```

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::handlers;
use crate::middlewares::AuthMiddleware;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_admin_routes(cfg);
}

/// 인증 관련 라우트 (Public)
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"identifier":"user@example.com","password":"P@ssw0rd1"}'
///
/// # refresh 토큰으로 갱신
/// curl -X POST http://localhost:8080/api/v1/auth/refresh \
///   -H "Authorization: Bearer <refresh token>"
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::register_multipart)
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::multi_login)
            .service(handlers::auth::login_with_otp)
            .service(handlers::auth::google_login)
            .service(handlers::auth::refresh_token)
            .service(handlers::auth::logout)
            .service(handlers::auth::forgot_password)
            .service(handlers::auth::reset_password_otp)
            .service(handlers::auth::send_otp)
            .service(handlers::auth::verify_otp)
            .service(handlers::auth::verify_email),
    );
}

/// 본인 계정 라우트 (Bearer access 토큰 필요)
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::get_me)
            .service(handlers::users::update_me)
            .service(handlers::users::get_my_activity)
            .service(handlers::users::change_password)
            .service(handlers::users::verify_phone)
            .service(handlers::users::delete_me),
    );
}

/// 관리자 라우트 (ADMIN 역할 필요)
fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(AuthMiddleware::admin())
            .service(handlers::admin::block_user)
            .service(handlers::admin::unblock_user)
            .service(handlers::admin::get_block_details)
            .service(handlers::admin::list_blocked_users)
            .service(handlers::admin::update_status),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "identity_service",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z",
///   "features": { "database": "MongoDB", "blockRegistry": "Redis", "tokens": "JWT HS256" }
/// }
/// ```
#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "identity_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "blockRegistry": "Redis",
            "tokens": "JWT HS256"
        }
    }))
}
