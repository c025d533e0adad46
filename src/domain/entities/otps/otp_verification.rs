//! OTP 원장 레코드
//!
//! `(phone_or_email, purpose)` 키마다 미검증 레코드는 최대 하나만 존재합니다.
//! 이 제약은 `verified == false` 조건의 부분 유니크 인덱스로 저장소에서 강제됩니다.

use std::fmt;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// OTP 발급 목적
///
/// 알려진 목적 외의 문자열은 `Custom`으로 보존됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OtpPurpose {
    PasswordReset,
    EmailVerification,
    PhoneVerification,
    Custom(String),
}

impl OtpPurpose {
    pub fn as_str(&self) -> &str {
        match self {
            OtpPurpose::PasswordReset => "PASSWORD_RESET",
            OtpPurpose::EmailVerification => "EMAIL_VERIFICATION",
            OtpPurpose::PhoneVerification => "PHONE_VERIFICATION",
            OtpPurpose::Custom(value) => value,
        }
    }
}

impl From<String> for OtpPurpose {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "PASSWORD_RESET" => OtpPurpose::PasswordReset,
            "EMAIL_VERIFICATION" => OtpPurpose::EmailVerification,
            "PHONE_VERIFICATION" => OtpPurpose::PhoneVerification,
            _ => OtpPurpose::Custom(value.trim().to_string()),
        }
    }
}

impl From<&str> for OtpPurpose {
    fn from(value: &str) -> Self {
        OtpPurpose::from(value.to_string())
    }
}

impl From<OtpPurpose> for String {
    fn from(purpose: OtpPurpose) -> Self {
        purpose.as_str().to_string()
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerification {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub phone_or_email: String,
    pub otp: String,
    pub purpose: OtpPurpose,
    pub verified: bool,
    pub attempts: i32,
    /// 낙관적 동시성 제어용 버전
    pub version: i64,
    pub created_at: DateTime,
    pub expires_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime>,
}

impl OtpVerification {
    /// 새 미검증 레코드를 만듭니다. 만료 시각은 생성 시각 + `ttl_minutes`입니다.
    pub fn pending(phone_or_email: &str, purpose: OtpPurpose, otp: String, ttl_minutes: i64) -> Self {
        let now = DateTime::now();

        Self {
            id: ObjectId::new(),
            phone_or_email: phone_or_email.to_string(),
            otp,
            purpose,
            verified: false,
            attempts: 0,
            version: 0,
            created_at: now,
            expires_at: DateTime::from_millis(now.timestamp_millis() + ttl_minutes * 60_000),
            verified_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime) -> bool {
        now > self.expires_at
    }
}
