//! 차단 게이트
//!
//! 두 가지 근거 중 하나라도 활성 차단이면 접근을 거부합니다.
//!
//! 1. 사용자 문서의 `is_blocked` 플래그 (`blocked_until`이 없거나 미래)
//! 2. 차단 레지스트리의 활성 레코드 (영구, 또는 `unblock_at`이 미래)
//!
//! 레지스트리 조회 실패는 경고만 남깁니다. 관리자 차단은 항상 사용자 문서에도
//! 기록되므로 1번 판정만으로 차단 상태가 유지됩니다.

use std::sync::Arc;

use chrono::Utc;
use log::warn;
use mongodb::bson::DateTime;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::User;
use crate::repositories::BlockStore;

const DEFAULT_REASON: &str = "관리자에 의해 차단된 계정입니다";

pub struct BlockGate {
    registry: Arc<dyn BlockStore>,
}

impl BlockGate {
    pub fn new(registry: Arc<dyn BlockStore>) -> Self {
        Self { registry }
    }

    /// 활성 차단이면 사유와 함께 `UserBlocked`를 돌려줍니다.
    pub async fn check(&self, user: &User) -> AppResult<()> {
        match self.active_reason(user).await {
            Some(reason) => Err(AppError::UserBlocked(reason)),
            None => Ok(()),
        }
    }

    pub async fn is_blocked(&self, user: &User) -> bool {
        self.active_reason(user).await.is_some()
    }

    async fn active_reason(&self, user: &User) -> Option<String> {
        if user.is_block_active(DateTime::now()) {
            return Some(
                user.blocked_reason
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REASON.to_string()),
            );
        }

        let user_id = user.id_string()?;
        match self.registry.get(&user_id).await {
            Ok(Some(record)) if record.is_active(Utc::now()) => Some(record.reason),
            Ok(_) => None,
            Err(e) => {
                warn!("차단 레지스트리 조회 실패 ({}): {}", user_id, e);
                None
            }
        }
    }
}
