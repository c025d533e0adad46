use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::dto::auth::request::validate_password_strength;
use crate::domain::entities::users::UserStatus;
use crate::utils::string_utils::deserialize_optional_string;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "현재 비밀번호를 입력해주세요"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "비밀번호는 8-128자 사이여야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPhoneRequest {
    #[validate(length(equal = 6, message = "OTP는 6자리입니다"))]
    pub otp: String,
}

/// 본인 프로필 수정
///
/// 보낸 필드만 바뀝니다. 이메일, 사용자명, 역할은 여기서 바꿀 수 없습니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "유효한 이미지 URL을 입력해주세요"))]
    pub profile_image_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.profile_image_url.is_none()
    }
}

/// `GET /users/me/activity` 쿼리
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// 관리자 차단 요청
///
/// 임시 차단(`permanent == false`)이면 `durationHours`가 필요합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_block_duration"))]
pub struct BlockUserRequest {
    #[validate(length(min = 1, max = 500, message = "차단 사유는 1-500자 사이여야 합니다"))]
    pub reason: String,

    #[serde(default)]
    pub permanent: bool,

    #[validate(range(min = 1, max = 8760, message = "차단 기간은 1-8760시간 사이여야 합니다"))]
    pub duration_hours: Option<i64>,
}

fn validate_block_duration(req: &BlockUserRequest) -> Result<(), ValidationError> {
    if !req.permanent && req.duration_hours.is_none() {
        return Err(ValidationError::new("duration_required")
            .with_message("임시 차단에는 차단 기간이 필요합니다".into()));
    }
    Ok(())
}
