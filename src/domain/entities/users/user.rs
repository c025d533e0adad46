//! 사용자(아이덴티티) 엔티티
//!
//! `users` 컬렉션에 저장되는 자격 증명 레코드입니다.
//! 이메일은 항상 유일하고, 사용자명과 전화번호는 값이 있을 때만 유일합니다.
//! 비밀번호는 해시로만 저장되며 평문은 어떤 경로로도 보관하지 않습니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
    Premium,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::Premium => "PREMIUM",
        }
    }

    /// 대소문자를 구분하지 않고 역할 문자열을 해석합니다.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            "PREMIUM" => Ok(Role::Premium),
            other => Err(AppError::ValidationError(format!(
                "지원하지 않는 역할입니다: {}",
                other
            ))),
        }
    }
}

/// 계정 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub password_hash: String,

    pub full_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,

    pub role: Role,
    pub status: UserStatus,
    pub is_active: bool,

    /// 가입 이메일 인증 완료 여부
    pub is_verified: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub phone_verified: bool,

    #[serde(default)]
    pub is_premium: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_expires_at: Option<DateTime>,

    /// 가입 인증 코드 슬롯
    ///
    /// 가입 직후 발송한 이메일 인증 코드가 저장됩니다.
    /// OTP 원장과는 별개의 저장소이며 만료 시각만 가지고 시도 횟수는 세지 않습니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_expiry: Option<DateTime>,

    #[serde(default)]
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_at: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by_admin_id: Option<String>,
    /// 임시 차단 해제 시각 (영구 차단이면 `None`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_until: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 가입 직후 상태의 사용자를 생성합니다.
    ///
    /// ACTIVE, 미인증, 일반(비프리미엄) 상태로 시작합니다.
    pub fn new_local(
        email: String,
        password_hash: String,
        full_name: String,
        username: Option<String>,
        phone: Option<String>,
        role: Role,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            username,
            phone,
            password_hash,
            full_name,
            profile_image_url: None,
            role,
            status: UserStatus::Active,
            is_active: true,
            is_verified: false,
            email_verified: false,
            phone_verified: false,
            is_premium: false,
            premium_expires_at: None,
            reset_password_token: None,
            reset_password_expiry: None,
            is_blocked: false,
            blocked_at: None,
            blocked_reason: None,
            blocked_by_admin_id: None,
            blocked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 토큰 클레임에 들어가는 구독 등급
    pub fn subscription_type(&self) -> &'static str {
        let premium_valid = self.is_premium
            && self
                .premium_expires_at
                .map(|expires| expires > DateTime::now())
                .unwrap_or(true);

        if premium_valid { "PREMIUM" } else { "FREE" }
    }

    /// 신원 플래그 기준으로 현재 차단 중인지 확인합니다.
    ///
    /// `blocked_until`이 지난 임시 차단은 해제 배치가 돌기 전이라도 차단으로 보지 않습니다.
    pub fn is_block_active(&self, now: DateTime) -> bool {
        self.is_blocked && self.blocked_until.map(|until| until > now).unwrap_or(true)
    }

    pub fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }

    /// 차단 관련 필드를 모두 초기화합니다.
    pub fn clear_block(&mut self) {
        self.is_blocked = false;
        self.blocked_at = None;
        self.blocked_reason = None;
        self.blocked_by_admin_id = None;
        self.blocked_until = None;
        self.touch();
    }

    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
        self.is_active = status == UserStatus::Active;
        self.touch();
    }
}
