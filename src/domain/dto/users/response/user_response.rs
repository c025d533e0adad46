//! 사용자 프로필 응답
//!
//! 비밀번호 해시, 인증 코드 슬롯, 차단 처리 관리자 ID 같은 내부 필드는
//! `From<User>` 변환 단계에서 제외됩니다.

use mongodb::bson::DateTime;
use serde::Serialize;

use crate::domain::entities::users::{Role, User, UserStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub full_name: String,
    pub profile_image_url: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub is_active: bool,
    pub is_verified: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub is_premium: bool,
    pub subscription_type: String,
    pub premium_expires_at: Option<String>,
    pub is_blocked: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn rfc3339(value: DateTime) -> String {
    value.try_to_rfc3339_string().unwrap_or_default()
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let subscription_type = user.subscription_type().to_string();
        let is_blocked = user.is_block_active(DateTime::now());

        Self {
            id: user.id_string().unwrap_or_default(),
            email: user.email,
            username: user.username,
            phone: user.phone,
            full_name: user.full_name,
            profile_image_url: user.profile_image_url,
            role: user.role,
            status: user.status,
            is_active: user.is_active,
            is_verified: user.is_verified,
            email_verified: user.email_verified,
            phone_verified: user.phone_verified,
            is_premium: user.is_premium,
            subscription_type,
            premium_expires_at: user.premium_expires_at.map(rfc3339),
            is_blocked,
            last_login_at: user.last_login_at.map(rfc3339),
            created_at: rfc3339(user.created_at),
            updated_at: rfc3339(user.updated_at),
        }
    }
}
