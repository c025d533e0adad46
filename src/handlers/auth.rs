//! Authentication HTTP Handlers
//!
//! `/api/v1/auth/*` 공개 엔드포인트입니다. 모든 로직은 [`IdentityService`]에 있고,
//! 핸들러는 바디/헤더를 꺼내 넘기고 결과를 공통 envelope로 감쌉니다.
//!
//! # Endpoints
//!
//! - `POST /auth/register` (`multipart/form-data` 또는 JSON), `/login`, `/multi-login`, `/login-with-otp`
//! - `POST /auth/google` (미지원, 501)
//! - `POST /auth/refresh` (Bearer = refresh 토큰), `/logout` (Bearer = access 토큰)
//! - `POST /auth/forgot-password`, `/reset-password-otp`
//! - `POST /auth/send-otp`, `/verify-otp`, `/verify-email`
//!
//! [`IdentityService`]: crate::services::auth::IdentityService

use actix_multipart::Multipart;
use actix_web::guard::GuardContext;
use actix_web::http::header;
use actix_web::{post, web, HttpRequest, HttpResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::StreamExt;
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::dto::auth::{
    ForgotPasswordRequest, GoogleLoginRequest, LoginRequest, LoginWithOtpRequest, MultiLoginRequest,
    OtpVerificationResponse, ProfileImagePayload, RegisterRequest, ResetPasswordOtpRequest, SendOtpRequest,
    VerifyEmailRequest, VerifyOtpRequest,
};
use crate::domain::dto::ApiResponse;
use crate::domain::models::auth::ClientInfo;
use crate::services::auth::TokenService;

const REGISTERED_MESSAGE: &str = "회원가입이 완료되었습니다. 이메일로 전송된 인증 코드를 확인해주세요";

/// 프로필 이미지 최대 크기 (5MB)
const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const MAX_TEXT_FIELD_BYTES: usize = 4 * 1024;

fn is_multipart(ctx: &GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// 회원가입 (multipart)
///
/// # Endpoint
/// `POST /auth/register` → 201
///
/// 텍스트 필드: `email`, `password`, `fullName`, `username`, `phone`, `role`
/// 파일 필드: `profileImage`
#[post("/register", guard = "is_multipart")]
pub async fn register_multipart(
    context: web::Data<AppContext>,
    client: ClientInfo,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let request = read_register_form(payload).await?;
    let user = context.identity.register(request, &client).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(user, REGISTERED_MESSAGE)))
}

/// 회원가입 (JSON, 이미지는 `profileImage.data`에 base64)
#[post("/register")]
pub async fn register(
    context: web::Data<AppContext>,
    client: ClientInfo,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = context.identity.register(payload.into_inner(), &client).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(user, REGISTERED_MESSAGE)))
}

/// multipart 바디를 `RegisterRequest`로 모읍니다. 모르는 필드는 무시합니다.
async fn read_register_form(mut payload: Multipart) -> Result<RegisterRequest, AppError> {
    let mut email = None;
    let mut password = None;
    let mut full_name = None;
    let mut username = None;
    let mut phone = None;
    let mut role = None;
    let mut profile_image = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::ValidationError(format!("잘못된 multipart 요청입니다: {}", e)))?;
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let limit = if name == "profileImage" {
            MAX_PROFILE_IMAGE_BYTES
        } else {
            MAX_TEXT_FIELD_BYTES
        };
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::ValidationError(format!("잘못된 multipart 요청입니다: {}", e)))?;
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::ValidationError(format!("{} 필드가 너무 큽니다", name)));
            }
            bytes.extend_from_slice(&chunk);
        }

        if name == "profileImage" {
            if !bytes.is_empty() {
                profile_image = Some(ProfileImagePayload {
                    file_name: file_name.unwrap_or_else(|| "profile".to_string()),
                    content_type,
                    data: STANDARD.encode(&bytes),
                });
            }
            continue;
        }

        let value = String::from_utf8(bytes)
            .map_err(|_| AppError::ValidationError(format!("{} 필드는 UTF-8 텍스트여야 합니다", name)))?;
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());

        match name.as_str() {
            "email" => email = value,
            "password" => password = value,
            "fullName" => full_name = value,
            "username" => username = value,
            "phone" => phone = value,
            "role" => role = value,
            _ => {}
        }
    }

    Ok(RegisterRequest {
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
        full_name: full_name.unwrap_or_default(),
        username,
        phone,
        role,
        profile_image,
    })
}

/// 이메일 또는 전화번호 + 비밀번호 로그인
#[post("/login")]
pub async fn login(
    context: web::Data<AppContext>,
    client: ClientInfo,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let tokens = context.identity.login(payload.into_inner(), &client).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(tokens, "로그인 성공")))
}

/// 이메일/사용자명/전화번호 로그인 (`loginType: "otp"` 지원)
#[post("/multi-login")]
pub async fn multi_login(
    context: web::Data<AppContext>,
    client: ClientInfo,
    payload: web::Json<MultiLoginRequest>,
) -> Result<HttpResponse, AppError> {
    let tokens = context
        .identity
        .multi_login(payload.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(tokens, "로그인 성공")))
}

#[post("/login-with-otp")]
pub async fn login_with_otp(
    context: web::Data<AppContext>,
    client: ClientInfo,
    payload: web::Json<LoginWithOtpRequest>,
) -> Result<HttpResponse, AppError> {
    let tokens = context
        .identity
        .login_with_otp(payload.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(tokens, "로그인 성공")))
}

/// 토큰 갱신
///
/// Authorization 헤더에 refresh 토큰을 실어 보냅니다. access 토큰은 거부됩니다.
///
/// # Endpoint
/// `POST /auth/refresh`
#[post("/google")]
pub async fn google_login(
    context: web::Data<AppContext>,
    payload: web::Json<GoogleLoginRequest>,
) -> Result<HttpResponse, AppError> {
    let tokens = context.identity.google_login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(tokens, "로그인 성공")))
}

#[post("/refresh")]
pub async fn refresh_token(
    context: web::Data<AppContext>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let tokens = context.identity.refresh_token(token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(tokens, "토큰이 갱신되었습니다")))
}

/// 로그아웃
///
/// 서버에 토큰 상태가 없으므로 활동 기록만 남기고 성공을 돌려줍니다.
#[post("/logout")]
pub async fn logout(
    context: web::Data<AppContext>,
    client: ClientInfo,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    context.identity.logout(token, &client).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("로그아웃 되었습니다")))
}

#[post("/forgot-password")]
pub async fn forgot_password(
    context: web::Data<AppContext>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    context.identity.forgot_password(&payload.phone_or_email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("비밀번호 재설정 코드가 전송되었습니다")))
}

#[post("/reset-password-otp")]
pub async fn reset_password_otp(
    context: web::Data<AppContext>,
    client: ClientInfo,
    payload: web::Json<ResetPasswordOtpRequest>,
) -> Result<HttpResponse, AppError> {
    context
        .identity
        .reset_password_with_otp(payload.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("비밀번호가 재설정되었습니다")))
}

#[post("/send-otp")]
pub async fn send_otp(
    context: web::Data<AppContext>,
    payload: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    context
        .identity
        .send_otp(&payload.phone_or_email, &payload.purpose)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("인증 코드가 전송되었습니다")))
}

/// OTP 확인
///
/// 불일치/만료/시도 초과는 모두 `INVALID_OTP`로 응답합니다.
#[post("/verify-otp")]
pub async fn verify_otp(
    context: web::Data<AppContext>,
    payload: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let verified = context
        .identity
        .verify_otp(&payload.phone_or_email, &payload.otp, &payload.purpose)
        .await?;
    if !verified {
        return Err(AppError::InvalidOtp);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        OtpVerificationResponse { verified },
        "인증되었습니다",
    )))
}

/// 가입 이메일 인증
#[post("/verify-email")]
pub async fn verify_email(
    context: web::Data<AppContext>,
    client: ClientInfo,
    payload: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = context
        .identity
        .verify_email(&payload.user_id, &payload.otp, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, "이메일 인증이 완료되었습니다")))
}

/// Authorization 헤더에서 Bearer 토큰을 꺼냅니다.
fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    TokenService::extract_bearer_token(header)
}
