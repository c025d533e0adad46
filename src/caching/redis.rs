//! # Redis 클라이언트
//!
//! `ConnectionManager`가 끊어진 연결을 자동으로 복구하므로
//! 호출마다 새 연결을 열지 않고 관리자를 복제해 사용합니다.
//! 값은 모두 JSON 문자열로 저장됩니다.

use log::info;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, ErrorKind, RedisError};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::StorageConfig;

#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    pub async fn connect() -> Result<Self, RedisError> {
        Self::connect_with(&StorageConfig::redis_url()).await
    }

    pub async fn connect_with(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let mut manager = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<()>(&mut manager).await?;
        info!("✅ Redis 연결 성공");

        Ok(Self { manager })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RedisError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    RedisError::from((ErrorKind::TypeError, "Deserialization failed", e.to_string()))
                })
            })
            .transpose()
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), RedisError> {
        let json = serde_json::to_string(value).map_err(|e| {
            RedisError::from((ErrorKind::TypeError, "Serialization failed", e.to_string()))
        })?;

        let mut conn = self.manager.clone();
        conn.set_ex(key, json, seconds).await
    }

    pub async fn del(&self, key: &str) -> Result<(), RedisError> {
        let mut conn = self.manager.clone();
        conn.del(key).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, RedisError> {
        let mut conn = self.manager.clone();
        conn.keys(pattern).await
    }
}
