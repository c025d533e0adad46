//! OTP 원장 저장소
//!
//! 키 `(phone_or_email, purpose)`당 미검증 레코드는 하나뿐입니다.
//! 갱신은 모두 `version` 비교 후 교체(compare-and-swap)로 이루어집니다.

pub mod otp_repo;

pub use otp_repo::OtpRepository;

use async_trait::async_trait;
use mongodb::bson::{DateTime, oid::ObjectId};

use crate::core::errors::AppResult;
use crate::domain::entities::otps::{OtpPurpose, OtpVerification};

/// `insert` 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpInsert {
    Inserted,
    /// 같은 키의 미검증 레코드가 동시에 생성되어 유니크 제약에 걸림
    Duplicate,
}

#[async_trait]
pub trait OtpStore: Send + Sync {
    /// 키에 해당하는 미검증 레코드를 모두 삭제하고 삭제 건수를 돌려줍니다.
    async fn delete_pending(&self, phone_or_email: &str, purpose: &OtpPurpose) -> AppResult<u64>;

    async fn find_pending(
        &self,
        phone_or_email: &str,
        purpose: &OtpPurpose,
    ) -> AppResult<Option<OtpVerification>>;

    async fn insert(&self, record: &OtpVerification) -> AppResult<OtpInsert>;

    /// 저장된 버전이 `expected_version`일 때만 레코드를 교체합니다.
    async fn replace_if_version(
        &self,
        record: &OtpVerification,
        expected_version: i64,
    ) -> AppResult<bool>;

    /// 저장된 버전이 `expected_version`일 때만 레코드를 삭제합니다.
    async fn delete_if_version(&self, id: &ObjectId, expected_version: i64) -> AppResult<bool>;

    /// `expires_at`이 지난 레코드를 검증 여부와 관계없이 삭제합니다.
    async fn delete_expired(&self, now: DateTime) -> AppResult<u64>;
}
