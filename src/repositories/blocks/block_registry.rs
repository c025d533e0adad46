//! Redis 기반 차단 레지스트리
//!
//! 키 `blocked_users:{userId}`에 JSON 레코드를 TTL과 함께 저장합니다.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use super::BlockStore;
use crate::caching::redis::RedisClient;
use crate::core::errors::AppResult;
use crate::domain::entities::blocks::BlockedUser;

const KEY_PREFIX: &str = "blocked_users:";

pub struct RedisBlockRegistry {
    redis: Arc<RedisClient>,
}

impl RedisBlockRegistry {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    fn key(user_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, user_id)
    }
}

#[async_trait]
impl BlockStore for RedisBlockRegistry {
    async fn put(&self, record: &BlockedUser, ttl_secs: u64) -> AppResult<()> {
        self.redis
            .set_with_expiry(&Self::key(&record.user_id), record, ttl_secs.max(1))
            .await?;
        Ok(())
    }

    async fn get(&self, user_id: &str) -> AppResult<Option<BlockedUser>> {
        Ok(self.redis.get(&Self::key(user_id)).await?)
    }

    async fn remove(&self, user_id: &str) -> AppResult<()> {
        self.redis.del(&Self::key(user_id)).await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<BlockedUser>> {
        let keys = self.redis.keys(&format!("{}*", KEY_PREFIX)).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            // 조회 사이에 TTL이 만료된 키는 건너뜁니다.
            match self.redis.get::<BlockedUser>(&key).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!("차단 레코드 읽기 실패 ({}): {}", key, e),
            }
        }

        Ok(records)
    }
}
