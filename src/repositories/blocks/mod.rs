//! 차단 레지스트리
//!
//! 관리자가 건 차단을 TTL과 함께 보관하는 휘발성 저장소입니다.
//! 영구성은 사용자 문서의 차단 플래그가 보존하고, 레지스트리는 빠른 조회용입니다.

pub mod block_registry;

pub use block_registry::RedisBlockRegistry;

use async_trait::async_trait;

use crate::core::errors::AppResult;
use crate::domain::entities::blocks::BlockedUser;

#[async_trait]
pub trait BlockStore: Send + Sync {
    async fn put(&self, record: &BlockedUser, ttl_secs: u64) -> AppResult<()>;

    async fn get(&self, user_id: &str) -> AppResult<Option<BlockedUser>>;

    async fn remove(&self, user_id: &str) -> AppResult<()>;

    async fn list(&self) -> AppResult<Vec<BlockedUser>>;
}
