//! # OTP 원장 서비스
//!
//! `(식별자, 목적)` 키마다 하나의 미검증 코드를 관리합니다.
//!
//! ```text
//! none ──send──▶ pending ──verify(ok)──▶ verified
//!                   │
//!                   ├── now > expires_at ──▶ 삭제 (expired)
//!                   └── attempts ≥ max ────▶ 삭제 (exhausted)
//! ```
//!
//! - 발송이 성공한 경우에만 레코드를 저장합니다.
//! - 검증은 `version` 비교 후 교체로 갱신되므로, 동시에 들어온 검증 요청이
//!   시도 횟수 제한을 넘어설 수 없습니다.
//! - 검증 완료된 레코드는 남겨두고 만료 정리 배치가 지웁니다.

use std::sync::Arc;

use log::{error, info, warn};
use mongodb::bson::DateTime;
use rand::Rng;
use rand::rngs::OsRng;

use crate::config::OtpConfig;
use crate::core::errors::AppResult;
use crate::domain::entities::otps::{OtpPurpose, OtpVerification};
use crate::domain::models::identifier::{Identifier, IdentifierKind};
use crate::repositories::{OtpInsert, OtpStore};
use crate::services::notifications::{EmailGateway, SmsGateway, templates};
use crate::utils::string_utils::mask_contact;

/// 동시 발급 충돌 시 purge 후 재삽입 횟수
const INSERT_RETRIES: usize = 3;
/// 검증 중 버전 충돌 시 재시도 횟수
const VERIFY_RETRIES: usize = 5;
const RECIPIENT_NAME: &str = "User";

#[derive(Debug, Clone, Copy)]
pub struct OtpPolicy {
    pub ttl_minutes: i64,
    pub max_attempts: i32,
}

impl OtpPolicy {
    pub fn from_env() -> Self {
        Self {
            ttl_minutes: OtpConfig::expiration_minutes(),
            max_attempts: OtpConfig::max_attempts(),
        }
    }
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl_minutes: 5,
            max_attempts: 3,
        }
    }
}

pub struct OtpService {
    store: Arc<dyn OtpStore>,
    email: Arc<dyn EmailGateway>,
    sms: Arc<dyn SmsGateway>,
    policy: OtpPolicy,
}

impl OtpService {
    pub fn new(
        store: Arc<dyn OtpStore>,
        email: Arc<dyn EmailGateway>,
        sms: Arc<dyn SmsGateway>,
        policy: OtpPolicy,
    ) -> Self {
        Self {
            store,
            email,
            sms,
            policy,
        }
    }

    pub fn policy(&self) -> OtpPolicy {
        self.policy
    }

    /// 100000..=999999 범위의 6자리 코드 (OS 난수)
    pub fn generate_code() -> String {
        OsRng.gen_range(100_000u32..=999_999).to_string()
    }

    pub fn is_valid_phone_or_email(value: &str) -> bool {
        Identifier::parse(value).is_ok()
    }

    /// 새 코드를 발급해 전송합니다.
    ///
    /// 형식이 잘못된 식별자는 `ValidationError`, 전송 실패는 `Ok(false)`입니다.
    /// 코드는 어떤 경우에도 반환하지 않습니다.
    pub async fn send(&self, phone_or_email: &str, purpose: &OtpPurpose) -> AppResult<bool> {
        let identifier = Identifier::parse(phone_or_email)?;
        let key = identifier.value.as_str();
        let masked = mask_contact(key);

        self.store.delete_pending(key, purpose).await?;

        let code = Self::generate_code();
        if let Err(e) = self.deliver(&identifier, purpose, &code).await {
            warn!("OTP 전송 실패 ({}, {}): {}", masked, purpose, e);
            return Ok(false);
        }

        let record = OtpVerification::pending(key, purpose.clone(), code, self.policy.ttl_minutes);

        for attempt in 1..=INSERT_RETRIES {
            match self.store.insert(&record).await? {
                OtpInsert::Inserted => {
                    info!("OTP 발급 완료: {} ({})", masked, purpose);
                    return Ok(true);
                }
                OtpInsert::Duplicate => {
                    warn!(
                        "동시 발급 충돌, 기존 코드 정리 후 재시도 {}/{}: {} ({})",
                        attempt, INSERT_RETRIES, masked, purpose
                    );
                    self.store.delete_pending(key, purpose).await?;
                }
            }
        }

        error!("OTP 저장 실패, 충돌이 계속됩니다: {} ({})", masked, purpose);
        Ok(false)
    }

    /// 코드를 검증합니다. 성공은 키당 정확히 한 번입니다.
    ///
    /// 레코드가 없거나, 만료되었거나, 시도 횟수를 다 썼거나, 코드가 틀리면 `false`입니다.
    pub async fn verify(&self, phone_or_email: &str, otp: &str, purpose: &OtpPurpose) -> AppResult<bool> {
        let Ok(identifier) = Identifier::parse(phone_or_email) else {
            return Ok(false);
        };
        let key = identifier.value.as_str();
        let masked = mask_contact(key);

        for _ in 0..VERIFY_RETRIES {
            let Some(mut record) = self.store.find_pending(key, purpose).await? else {
                warn!("대기 중인 OTP 없음: {} ({})", masked, purpose);
                return Ok(false);
            };

            let now = DateTime::now();
            let expected_version = record.version;

            if record.is_expired(now) {
                warn!("OTP 만료: {} ({})", masked, purpose);
                self.store.delete_if_version(&record.id, expected_version).await?;
                return Ok(false);
            }

            if record.attempts >= self.policy.max_attempts {
                warn!("OTP 시도 횟수 초과: {} ({})", masked, purpose);
                self.store.delete_if_version(&record.id, expected_version).await?;
                return Ok(false);
            }

            record.attempts += 1;
            record.version += 1;

            if !codes_match(otp.trim(), &record.otp) {
                let applied = if record.attempts >= self.policy.max_attempts {
                    self.store.delete_if_version(&record.id, expected_version).await?
                } else {
                    self.store.replace_if_version(&record, expected_version).await?
                };

                if applied {
                    warn!(
                        "잘못된 OTP: {} ({}) 시도 {}/{}",
                        masked, purpose, record.attempts, self.policy.max_attempts
                    );
                    return Ok(false);
                }
                continue;
            }

            record.verified = true;
            record.verified_at = Some(now);

            if self.store.replace_if_version(&record, expected_version).await? {
                info!("OTP 검증 성공: {} ({})", masked, purpose);
                return Ok(true);
            }
        }

        warn!("OTP 검증 경합이 계속되어 실패 처리합니다: {} ({})", masked, purpose);
        Ok(false)
    }

    /// 만료된 레코드를 모두 삭제하고 삭제 건수를 돌려줍니다.
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        let deleted = self.store.delete_expired(DateTime::now()).await?;
        if deleted > 0 {
            info!("만료된 OTP {}건 정리", deleted);
        }
        Ok(deleted)
    }

    async fn deliver(&self, identifier: &Identifier, purpose: &OtpPurpose, code: &str) -> AppResult<()> {
        let to = identifier.value.as_str();

        match identifier.kind {
            IdentifierKind::Email => match purpose {
                OtpPurpose::PasswordReset => {
                    self.email.send_password_reset_otp(to, code, RECIPIENT_NAME).await
                }
                OtpPurpose::EmailVerification => {
                    self.email
                        .send_email_verification_otp(to, code, RECIPIENT_NAME)
                        .await
                }
                _ => {
                    self.email
                        .send_custom_email(to, "OTP Verification", &templates::generic_otp(code))
                        .await
                }
            },
            IdentifierKind::Phone => match purpose {
                OtpPurpose::PasswordReset => self.sms.send_password_reset_otp(to, code).await,
                OtpPurpose::PhoneVerification => self.sms.send_phone_verification_otp(to, code).await,
                _ => self.sms.send_custom_sms(to, &templates::generic_otp(code)).await,
            },
        }
    }
}

/// 길이가 같으면 모든 바이트를 비교하는 상수 시간 비교
pub(crate) fn codes_match(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
