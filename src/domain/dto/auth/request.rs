//! 인증 API 요청 바디
//!
//! JSON 필드명은 camelCase입니다. 형식 검증은 `validator`가 담당하고,
//! 식별자 분류처럼 도메인 규칙이 필요한 검증은 서비스 계층에서 수행합니다.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::models::identifier::EMAIL_PATTERN;
use crate::utils::string_utils::deserialize_optional_string;

/// 회원가입 프로필 이미지 (base64 인코딩)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImagePayload {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(regex(path = *EMAIL_PATTERN, message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "비밀번호는 8-128자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub full_name: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 3, max = 30, message = "사용자명은 3-30자 사이여야 합니다"))]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub role: Option<String>,

    #[serde(default)]
    pub profile_image: Option<ProfileImagePayload>,
}

/// Google ID 토큰 로그인 (연동 전)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    #[validate(length(min = 1, message = "Google ID 토큰이 필요합니다"))]
    pub google_id_token: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "이메일 또는 전화번호를 입력해주세요"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 이메일/사용자명/전화번호 중 하나로 로그인
///
/// `loginType`이 `"otp"`이면 `password` 필드에 OTP 코드를 담습니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MultiLoginRequest {
    #[validate(length(min = 1, message = "로그인 식별자를 입력해주세요"))]
    pub login_identifier: String,

    #[validate(length(min = 1, message = "비밀번호 또는 OTP를 입력해주세요"))]
    pub password: String,

    #[serde(default)]
    pub login_type: Option<String>,
}

impl MultiLoginRequest {
    pub fn is_otp_login(&self) -> bool {
        self.login_type
            .as_deref()
            .map(|t| t.trim().eq_ignore_ascii_case("otp"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "이메일 또는 전화번호를 입력해주세요"))]
    pub phone_or_email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordOtpRequest {
    #[validate(length(min = 1, message = "이메일 또는 전화번호를 입력해주세요"))]
    pub phone_or_email: String,

    #[validate(length(equal = 6, message = "OTP는 6자리입니다"))]
    pub otp: String,

    #[validate(length(min = 8, max = 128, message = "비밀번호는 8-128자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[validate(length(min = 1, message = "이메일 또는 전화번호를 입력해주세요"))]
    pub phone_or_email: String,

    #[validate(length(min = 1, max = 64, message = "OTP 목적을 입력해주세요"))]
    pub purpose: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, message = "이메일 또는 전화번호를 입력해주세요"))]
    pub phone_or_email: String,

    #[validate(length(equal = 6, message = "OTP는 6자리입니다"))]
    pub otp: String,

    #[validate(length(min = 1, max = 64, message = "OTP 목적을 입력해주세요"))]
    pub purpose: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginWithOtpRequest {
    #[validate(length(min = 1, message = "이메일 또는 전화번호를 입력해주세요"))]
    pub phone_or_email: String,

    #[validate(length(equal = 6, message = "OTP는 6자리입니다"))]
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "사용자 ID를 입력해주세요"))]
    pub user_id: String,

    #[validate(length(equal = 6, message = "OTP는 6자리입니다"))]
    pub otp: String,
}

/// 대문자, 소문자, 숫자를 모두 포함해야 합니다.
pub(crate) fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 대문자, 소문자, 숫자를 포함해야 합니다".into()));
    }

    Ok(())
}
