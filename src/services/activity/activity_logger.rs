//! 아이덴티티 변경 감사 로그
//!
//! 기록 실패는 경고 로그만 남기고 호출자에게 전파하지 않습니다.

use std::sync::Arc;

use log::warn;
use mongodb::bson::DateTime;

use crate::core::errors::AppResult;
use crate::domain::entities::activities::{ActivityAction, UserActivity};
use crate::domain::models::auth::ClientInfo;
use crate::repositories::ActivityStore;

const FEATURE_AUTH: &str = "AUTH";

pub struct ActivityLogger {
    store: Arc<dyn ActivityStore>,
}

impl ActivityLogger {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    pub async fn log(
        &self,
        user_id: &str,
        action: ActivityAction,
        details: impl Into<String>,
        client: &ClientInfo,
    ) {
        let activity = UserActivity {
            id: None,
            user_id: user_id.to_string(),
            feature_name: FEATURE_AUTH.to_string(),
            action,
            details: details.into(),
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            created_at: DateTime::now(),
        };

        if let Err(e) = self.store.insert(&activity).await {
            warn!("활동 로그 기록 실패 ({:?}, user={}): {}", action, user_id, e);
        }
    }

    pub async fn recent(&self, user_id: &str, limit: i64) -> AppResult<Vec<UserActivity>> {
        self.store.find_recent_by_user(user_id, limit).await
    }
}
