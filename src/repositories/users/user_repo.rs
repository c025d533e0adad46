//! # 사용자 리포지토리 구현
//!
//! MongoDB `users` 컬렉션을 주 저장소로, Redis를 id 조회 캐시로 사용합니다.
//! 캐시는 10분간 유지되며 `save` 시 무효화됩니다. 캐시 장애는 조회를 실패시키지 않습니다.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{debug, warn};
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use super::UserStore;
use crate::caching::redis::RedisClient;
use crate::core::errors::{AppError, AppResult, UniqueField};
use crate::db::Database;
use crate::domain::entities::users::User;
use crate::repositories::duplicate_key_message;

const COLLECTION: &str = "users";
const CACHE_TTL_SECS: u64 = 600;

pub struct UserRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>, redis: Arc<RedisClient>) -> Self {
        Self { db, redis }
    }

    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection(COLLECTION)
    }

    fn cache_key(id: &str) -> String {
        format!("user:{}", id)
    }

    async fn find_one_by(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let mut filter = Document::new();
        filter.insert(field, value);

        Ok(self.collection().find_one(filter).await?)
    }

    async fn invalidate_cache(&self, id: &str) {
        if let Err(e) = self.redis.del(&Self::cache_key(id)).await {
            warn!("사용자 캐시 무효화 실패 ({}): {}", id, e);
        }
    }

    /// 유니크/조회용 인덱스를 생성합니다. 이미 있으면 아무 일도 일어나지 않습니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .name("username_unique".to_string())
                    .build(),
            )
            .build();

        let phone_index = IndexModel::builder()
            .keys(doc! { "phone": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .name("phone_unique".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_indexes([email_index, username_index, phone_index, created_at_index])
            .await?;

        Ok(())
    }
}

/// 위반된 인덱스 이름으로 충돌 필드를 판별합니다.
fn conflicting_field(message: &str) -> UniqueField {
    if message.contains("username_unique") {
        UniqueField::Username
    } else if message.contains("phone_unique") {
        UniqueField::Phone
    } else {
        UniqueField::Email
    }
}

fn map_write_error(error: mongodb::error::Error) -> AppError {
    match duplicate_key_message(&error) {
        Some(message) => AppError::Duplicate(conflicting_field(message)),
        None => error.into(),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let cache_key = Self::cache_key(id);
        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            debug!("사용자 캐시 적중: {}", id);
            return Ok(Some(cached));
        }

        let user = self
            .collection()
            .find_one(doc! { "_id": object_id })
            .await?;

        if let Some(ref user) = user {
            let _ = self
                .redis
                .set_with_expiry(&cache_key, user, CACHE_TTL_SECS)
                .await;
        }

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one_by("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.find_one_by("username", username).await
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        self.find_one_by("phone", phone).await
    }

    async fn insert(&self, mut user: User) -> AppResult<User> {
        let result = self
            .collection()
            .insert_one(&user)
            .await
            .map_err(map_write_error)?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자는 갱신할 수 없습니다".to_string()))?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": id }, user)
            .await
            .map_err(map_write_error)?;

        self.invalidate_cache(&id.to_hex()).await;

        if result.matched_count == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }

    async fn find_expired_blocks(&self, now: DateTime) -> AppResult<Vec<User>> {
        let cursor = self
            .collection()
            .find(doc! {
                "is_blocked": true,
                "blocked_until": { "$ne": null, "$lte": now },
            })
            .await?;

        Ok(cursor.try_collect().await?)
    }
}
