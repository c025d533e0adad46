//! # 애플리케이션 에러 처리
//!
//! 인증/아이덴티티 서비스 전역에서 사용하는 단일 에러 타입입니다.
//! 비즈니스 실패(잘못된 OTP, 중복 이메일, 차단된 계정 등)는 모두 `AppError`
//! 변형으로 표현되며, 서비스 계층은 예외 대신 `AppResult<T>`를 반환합니다.
//!
//! ## 응답 형식
//!
//! `actix_web::ResponseError` 구현이 모든 에러를 공통 envelope으로 변환합니다.
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "이미 사용 중인 이메일입니다",
//!   "error": { "code": "EMAIL_EXISTS", "message": "이미 사용 중인 이메일입니다" }
//! }
//! ```
//!
//! ## 상태 코드 매핑
//!
//! | AppError | 코드 | HTTP |
//! |----------|------|------|
//! | `ValidationError`, `InvalidInput` | `VALIDATION_FAILED` | 400 |
//! | `InvalidPassword` | `INVALID_PASSWORD` | 400 |
//! | `InvalidOtp` | `INVALID_OTP` | 400 |
//! | `OtpExpired` | `OTP_EXPIRED` | 400 |
//! | `UserNotFound` | `USER_NOT_FOUND` | 404 |
//! | `NotFound` | `NOT_FOUND` | 404 |
//! | `Duplicate` | `EMAIL_EXISTS` / `USERNAME_EXISTS` / `PHONE_EXISTS` | 409 |
//! | `ConflictError` | `CONFLICT` | 409 |
//! | `LoginFailed` | `LOGIN_FAILED` | 401 |
//! | `AuthenticationError` | `AUTHENTICATION_FAILED` | 401 |
//! | `InvalidToken` | `INVALID_TOKEN` | 401 |
//! | `UserBlocked` | `USER_BLOCKED` | 403 |
//! | `AuthorizationError` | `ACCESS_DENIED` | 403 |
//! | `OtpSendFailed` | `OTP_SEND_FAILED` | 503 |
//! | 인프라/내부 에러 | `INTERNAL_ERROR` | 500 |
//!
//! 500 계열 에러는 서버 로그에만 상세 내용을 남기고 클라이언트에는
//! 일반화된 메시지만 전달합니다.

use actix_web::http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::domain::dto::common::{ApiResponse, ErrorBody};

/// 유일성이 보장되어야 하는 아이덴티티 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
    Phone,
}

impl UniqueField {
    pub fn code(&self) -> &'static str {
        match self {
            UniqueField::Email => "EMAIL_EXISTS",
            UniqueField::Username => "USERNAME_EXISTS",
            UniqueField::Phone => "PHONE_EXISTS",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            UniqueField::Email => "이미 사용 중인 이메일입니다",
            UniqueField::Username => "이미 사용 중인 사용자명입니다",
            UniqueField::Phone => "이미 사용 중인 전화번호입니다",
        }
    }
}

/// 애플리케이션 전역 에러 타입
///
/// 인프라 계층 에러(`DatabaseError`, `RedisError`, `ExternalServiceError`,
/// `InternalError`)와 도메인 에러(나머지 변형)로 나뉩니다.
/// 도메인 에러는 그대로 클라이언트에 노출되고, 인프라 에러는 숨겨집니다.
///
/// ```rust,ignore
/// let user = store.find_by_id(user_id).await?
///     .ok_or(AppError::UserNotFound)?;
///
/// if !hasher.verify(&req.current_password, &user.password_hash)? {
///     return Err(AppError::InvalidPassword);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB 연산 실패
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 연산 실패
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 실패 (단일 메시지)
    #[error("{0}")]
    ValidationError(String),

    /// `validator` 필드 단위 검증 실패
    ///
    /// 필드별 에러 목록이 응답의 `error.details`로 전달됩니다.
    #[error("입력값 검증에 실패했습니다")]
    InvalidInput(validator::ValidationErrors),

    #[error("현재 비밀번호가 일치하지 않습니다")]
    InvalidPassword,

    #[error("유효하지 않은 OTP입니다")]
    InvalidOtp,

    #[error("OTP가 만료되었습니다")]
    OtpExpired,

    #[error("사용자를 찾을 수 없습니다")]
    UserNotFound,

    #[error("{0}")]
    NotFound(String),

    /// 이메일/사용자명/전화번호 중복
    #[error("{}", .0.message())]
    Duplicate(UniqueField),

    #[error("{0}")]
    ConflictError(String),

    /// 비밀번호 로그인 실패
    ///
    /// 어떤 식별자가 틀렸는지 노출하지 않도록 메시지는 항상 동일합니다.
    #[error("아이디 또는 비밀번호가 올바르지 않습니다")]
    LoginFailed,

    #[error("{0}")]
    AuthenticationError(String),

    /// 위조/만료/형식 오류 토큰
    #[error("유효하지 않거나 만료된 토큰입니다")]
    InvalidToken,

    /// 차단된 계정 (사유 포함)
    #[error("차단된 계정입니다: {0}")]
    UserBlocked(String),

    #[error("{0}")]
    AuthorizationError(String),

    /// 전달이 요청의 주 목적일 때의 이메일/SMS 전송 실패
    #[error("OTP 전송에 실패했습니다")]
    OtpSendFailed,

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 아직 연결되지 않은 로그인 방식 (Google 등)
    #[error("{0}")]
    NotImplemented(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 클라이언트에 전달되는 에러 코드
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => "VALIDATION_FAILED",
            AppError::InvalidPassword => "INVALID_PASSWORD",
            AppError::InvalidOtp => "INVALID_OTP",
            AppError::OtpExpired => "OTP_EXPIRED",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Duplicate(field) => field.code(),
            AppError::ConflictError(_) => "CONFLICT",
            AppError::LoginFailed => "LOGIN_FAILED",
            AppError::AuthenticationError(_) => "AUTHENTICATION_FAILED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::UserBlocked(_) => "USER_BLOCKED",
            AppError::AuthorizationError(_) => "ACCESS_DENIED",
            AppError::OtpSendFailed => "OTP_SEND_FAILED",
            AppError::NotImplemented(_) => "NOT_IMPLEMENTED",
            AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 서버 내부 사정으로 실패한 에러인지 여부
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseError(_)
                | AppError::RedisError(_)
                | AppError::ExternalServiceError(_)
                | AppError::InternalError(_)
        )
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::InvalidInput(errors) => serde_json::to_value(errors).ok(),
            AppError::UserBlocked(reason) => Some(json!({ "reason": reason })),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(errors)
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> Self {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(error: redis::RedisError) -> Self {
        AppError::RedisError(error.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidPassword
            | AppError::InvalidOtp
            | AppError::OtpExpired => StatusCode::BAD_REQUEST,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) | AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::LoginFailed | AppError::AuthenticationError(_) | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::UserBlocked(_) | AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::OtpSendFailed => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 공통 envelope 형태의 에러 응답을 생성합니다.
    ///
    /// 내부 에러는 원문을 `error!`로 기록하고 일반 메시지로 치환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let message = if self.is_internal() {
            log::error!("요청 처리 중 내부 오류 발생: {}", self);
            "서버 내부 오류가 발생했습니다".to_string()
        } else {
            self.to_string()
        };

        let body = ApiResponse::<()>::failure(ErrorBody {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        });

        actix_web::HttpResponse::build(self.status_code()).json(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 `InternalError`로 감싸는 확장 trait
///
/// ```rust,ignore
/// let hash = bcrypt::hash(password, cost).context("비밀번호 해싱 실패")?;
/// ```
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use validator::Validate;

    async fn body_json(error: AppError) -> serde_json::Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidOtp.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Duplicate(UniqueField::Phone).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::LoginFailed.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::UserBlocked("spam".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::OtpSendFailed.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::DatabaseError("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_codes_are_field_specific() {
        assert_eq!(AppError::Duplicate(UniqueField::Email).error_code(), "EMAIL_EXISTS");
        assert_eq!(
            AppError::Duplicate(UniqueField::Username).error_code(),
            "USERNAME_EXISTS"
        );
        assert_eq!(AppError::Duplicate(UniqueField::Phone).error_code(), "PHONE_EXISTS");
    }

    #[actix_web::test]
    async fn test_blocked_envelope_carries_reason() {
        let body = body_json(AppError::UserBlocked("약관 위반".into())).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "USER_BLOCKED");
        assert_eq!(body["error"]["details"]["reason"], "약관 위반");
    }

    #[actix_web::test]
    async fn test_internal_error_is_not_leaked() {
        let body = body_json(AppError::DatabaseError("connection refused at 10.0.0.3".into())).await;

        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(!message.contains("10.0.0.3"));
    }

    #[derive(Validate)]
    struct EmailForm {
        #[validate(email)]
        email: String,
    }

    #[actix_web::test]
    async fn test_field_errors_become_details() {
        let errors = EmailForm { email: "nope".into() }.validate().unwrap_err();
        let body = body_json(AppError::from(errors)).await;

        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert!(body["error"]["details"]["email"].is_array());
    }

    #[test]
    fn test_store_errors_convert_to_internal() {
        let redis_error = redis::RedisError::from((redis::ErrorKind::TypeError, "unexpected reply"));
        let error = AppError::from(redis_error);

        assert!(matches!(error, AppError::RedisError(_)));
        assert!(error.is_internal());
        assert_eq!(error.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_not_implemented_is_501() {
        let error = AppError::NotImplemented("Google 로그인".into());

        assert_eq!(error.status_code(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(error.error_code(), "NOT_IMPLEMENTED");
        assert!(!error.is_internal());
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        match app_result {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.contains("Additional context"));
                assert!(msg.contains("original error"));
            }
            _ => panic!("Expected InternalError"),
        }
    }
}
