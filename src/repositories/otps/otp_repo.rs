//! MongoDB `otps` 컬렉션 구현

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{DateTime, doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use super::{OtpInsert, OtpStore};
use crate::core::errors::AppResult;
use crate::db::Database;
use crate::domain::entities::otps::{OtpPurpose, OtpVerification};
use crate::repositories::duplicate_key_message;

const COLLECTION: &str = "otps";

pub struct OtpRepository {
    db: Arc<Database>,
}

impl OtpRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<OtpVerification> {
        self.db.get_database().collection(COLLECTION)
    }

    /// 미검증 레코드 한정 부분 유니크 인덱스와 만료 조회 인덱스를 생성합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let pending_unique = IndexModel::builder()
            .keys(doc! { "phone_or_email": 1, "purpose": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "verified": false })
                    .name("pending_key_unique".to_string())
                    .build(),
            )
            .build();

        let expires_at_index = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("expires_at_asc".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_indexes([pending_unique, expires_at_index])
            .await?;

        Ok(())
    }
}

#[async_trait]
impl OtpStore for OtpRepository {
    async fn delete_pending(&self, phone_or_email: &str, purpose: &OtpPurpose) -> AppResult<u64> {
        let result = self
            .collection()
            .delete_many(doc! {
                "phone_or_email": phone_or_email,
                "purpose": purpose.as_str(),
                "verified": false,
            })
            .await?;

        Ok(result.deleted_count)
    }

    async fn find_pending(
        &self,
        phone_or_email: &str,
        purpose: &OtpPurpose,
    ) -> AppResult<Option<OtpVerification>> {
        let pending = self
            .collection()
            .find_one(doc! {
                "phone_or_email": phone_or_email,
                "purpose": purpose.as_str(),
                "verified": false,
            })
            .await?;

        Ok(pending)
    }

    async fn insert(&self, record: &OtpVerification) -> AppResult<OtpInsert> {
        match self.collection().insert_one(record).await {
            Ok(_) => Ok(OtpInsert::Inserted),
            Err(e) if duplicate_key_message(&e).is_some() => Ok(OtpInsert::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_if_version(
        &self,
        record: &OtpVerification,
        expected_version: i64,
    ) -> AppResult<bool> {
        let result = self
            .collection()
            .replace_one(doc! { "_id": record.id, "version": expected_version }, record)
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn delete_if_version(&self, id: &ObjectId, expected_version: i64) -> AppResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id, "version": expected_version })
            .await?;

        Ok(result.deleted_count == 1)
    }

    async fn delete_expired(&self, now: DateTime) -> AppResult<u64> {
        let result = self
            .collection()
            .delete_many(doc! { "expires_at": { "$lt": now } })
            .await?;

        Ok(result.deleted_count)
    }
}
