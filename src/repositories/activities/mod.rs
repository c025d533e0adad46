//! 감사 로그 저장소

pub mod activity_repo;

pub use activity_repo::ActivityRepository;

use async_trait::async_trait;

use crate::core::errors::AppResult;
use crate::domain::entities::activities::UserActivity;

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn insert(&self, activity: &UserActivity) -> AppResult<()>;

    /// 최신순으로 최대 `limit`건
    async fn find_recent_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<UserActivity>>;
}
