//! # 관리자 차단 서비스
//!
//! 차단은 두 곳에 기록됩니다.
//!
//! - 사용자 문서: `is_blocked`, `blocked_at`, `blocked_reason`, `blocked_by_admin_id`, `blocked_until`
//! - 차단 레지스트리: TTL이 있는 휘발성 레코드 (임시 차단은 남은 시간, 영구 차단은 설정된 보관 기간)
//!
//! 주기 배치 [`BlockService::auto_unblock_expired`]가 기한이 지난 임시 차단을 양쪽에서 해제합니다.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use log::{info, warn};
use mongodb::bson::DateTime;

use super::BlockGate;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::BlockUserRequest;
use crate::domain::entities::activities::ActivityAction;
use crate::domain::entities::blocks::BlockedUser;
use crate::domain::entities::users::User;
use crate::domain::models::auth::ClientInfo;
use crate::repositories::{BlockStore, UserStore};
use crate::services::activity::ActivityLogger;
use crate::services::notifications::EmailGateway;

const MAX_BLOCK_HOURS: i64 = 8760;

fn to_utc(value: DateTime) -> Option<chrono::DateTime<Utc>> {
    chrono::DateTime::from_timestamp_millis(value.timestamp_millis())
}

pub struct BlockService {
    users: Arc<dyn UserStore>,
    registry: Arc<dyn BlockStore>,
    email: Arc<dyn EmailGateway>,
    activity: Arc<ActivityLogger>,
    gate: BlockGate,
    permanent_ttl_secs: u64,
}

impl BlockService {
    pub fn new(
        users: Arc<dyn UserStore>,
        registry: Arc<dyn BlockStore>,
        email: Arc<dyn EmailGateway>,
        activity: Arc<ActivityLogger>,
        permanent_ttl_secs: u64,
    ) -> Self {
        let gate = BlockGate::new(registry.clone());

        Self {
            users,
            registry,
            email,
            activity,
            gate,
            permanent_ttl_secs,
        }
    }

    async fn load_user(&self, user_id: &str) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// 사용자를 차단하고 레지스트리 레코드를 돌려줍니다.
    pub async fn block_user(
        &self,
        user_id: &str,
        request: &BlockUserRequest,
        admin_id: &str,
        client: &ClientInfo,
    ) -> AppResult<BlockedUser> {
        if user_id == admin_id {
            return Err(AppError::ValidationError("자기 자신은 차단할 수 없습니다".to_string()));
        }

        let duration_hours = if request.permanent {
            None
        } else {
            match request.duration_hours {
                Some(hours) if (1..=MAX_BLOCK_HOURS).contains(&hours) => Some(hours),
                _ => {
                    return Err(AppError::ValidationError(
                        "임시 차단에는 1-8760시간의 기간이 필요합니다".to_string(),
                    ));
                }
            }
        };

        let mut user = self.load_user(user_id).await?;

        let now = Utc::now();
        let unblock_at = duration_hours.map(|hours| now + Duration::hours(hours));
        let record = BlockedUser {
            user_id: user_id.to_string(),
            reason: request.reason.trim().to_string(),
            blocked_by_admin_id: admin_id.to_string(),
            permanent: request.permanent,
            blocked_at: now,
            unblock_at,
        };

        user.is_blocked = true;
        user.blocked_at = Some(DateTime::from_millis(now.timestamp_millis()));
        user.blocked_reason = Some(record.reason.clone());
        user.blocked_by_admin_id = Some(admin_id.to_string());
        user.blocked_until = unblock_at.map(|t| DateTime::from_millis(t.timestamp_millis()));
        user.touch();
        self.users.save(&user).await?;

        let ttl_secs = match duration_hours {
            Some(hours) => (hours * 3600) as u64,
            None => self.permanent_ttl_secs,
        };
        if let Err(e) = self.registry.put(&record, ttl_secs).await {
            warn!("차단 레지스트리 기록 실패 ({}), 사용자 플래그로 차단 유지: {}", user_id, e);
        }

        if let Err(e) = self
            .email
            .send_account_blocked_email(&user.email, &user.full_name, &record.reason)
            .await
        {
            warn!("차단 안내 메일 발송 실패 ({}): {}", user.email, e);
        }

        let details = match duration_hours {
            Some(hours) => format!("{}시간 차단: {}", hours, record.reason),
            None => format!("영구 차단: {}", record.reason),
        };
        self.activity
            .log(user_id, ActivityAction::UserBlocked, details, client)
            .await;

        info!("🚫 사용자 차단: {} (관리자 {})", user_id, admin_id);
        Ok(record)
    }

    /// 차단을 해제합니다. 차단 상태가 아니면 `NotFound`입니다.
    pub async fn unblock_user(&self, user_id: &str, admin_id: &str, client: &ClientInfo) -> AppResult<()> {
        let mut user = self.load_user(user_id).await?;
        let record = self.registry.get(user_id).await?;

        if !user.is_blocked && record.is_none() {
            return Err(AppError::NotFound("차단된 사용자가 아닙니다".to_string()));
        }

        user.clear_block();
        self.users.save(&user).await?;
        self.registry.remove(user_id).await?;

        self.activity
            .log(
                user_id,
                ActivityAction::UserUnblocked,
                format!("관리자 {} 해제", admin_id),
                client,
            )
            .await;

        info!("✅ 사용자 차단 해제: {} (관리자 {})", user_id, admin_id);
        Ok(())
    }

    pub async fn is_user_blocked(&self, user_id: &str) -> AppResult<bool> {
        let user = self.load_user(user_id).await?;
        Ok(self.gate.is_blocked(&user).await)
    }

    /// 레지스트리 레코드가 있으면 그것을, 없으면 사용자 플래그에서 재구성한 정보를 돌려줍니다.
    pub async fn get_blocking_details(&self, user_id: &str) -> AppResult<BlockedUser> {
        if let Some(record) = self.registry.get(user_id).await? {
            return Ok(record);
        }

        let user = self.load_user(user_id).await?;
        if !user.is_block_active(DateTime::now()) {
            return Err(AppError::NotFound("차단된 사용자가 아닙니다".to_string()));
        }

        Ok(BlockedUser {
            user_id: user_id.to_string(),
            reason: user.blocked_reason.clone().unwrap_or_default(),
            blocked_by_admin_id: user.blocked_by_admin_id.clone().unwrap_or_default(),
            permanent: user.blocked_until.is_none(),
            blocked_at: user.blocked_at.and_then(to_utc).unwrap_or_else(Utc::now),
            unblock_at: user.blocked_until.and_then(to_utc),
        })
    }

    /// 활성 차단 레코드 목록 (최근 차단 순)
    pub async fn get_all_blocked_users(&self) -> AppResult<Vec<BlockedUser>> {
        let now = Utc::now();
        let mut records: Vec<BlockedUser> = self
            .registry
            .list()
            .await?
            .into_iter()
            .filter(|record| record.is_active(now))
            .collect();

        records.sort_by(|a, b| b.blocked_at.cmp(&a.blocked_at));
        Ok(records)
    }

    /// 기한이 지난 임시 차단을 해제하고 해제된 사용자 수를 돌려줍니다.
    pub async fn auto_unblock_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut released: HashSet<String> = HashSet::new();

        for record in self.registry.list().await? {
            if !record.is_active(now) {
                self.registry.remove(&record.user_id).await?;
                released.insert(record.user_id);
            }
        }

        let system = ClientInfo::default();
        for mut user in self
            .users
            .find_expired_blocks(DateTime::from_millis(now.timestamp_millis()))
            .await?
        {
            let Some(user_id) = user.id_string() else {
                continue;
            };

            user.clear_block();
            self.users.save(&user).await?;
            self.registry.remove(&user_id).await?;
            self.activity
                .log(&user_id, ActivityAction::UserUnblocked, "차단 기간 만료로 자동 해제", &system)
                .await;
            released.insert(user_id);
        }

        if !released.is_empty() {
            info!("⏰ 만료된 차단 {}건 자동 해제", released.len());
        }
        Ok(released.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::Role;
    use crate::test_support::Harness;

    fn temporary(hours: i64) -> BlockUserRequest {
        BlockUserRequest {
            reason: "spam".into(),
            permanent: false,
            duration_hours: Some(hours),
        }
    }

    fn permanent() -> BlockUserRequest {
        BlockUserRequest {
            reason: "fraud".into(),
            permanent: true,
            duration_hours: None,
        }
    }

    #[tokio::test]
    async fn test_block_writes_flags_registry_and_notifies() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();

        let record = h
            .block_service
            .block_user(&id, &temporary(2), "admin-1", &ClientInfo::default())
            .await
            .unwrap();

        assert!(!record.permanent);
        assert!(record.unblock_at.is_some());
        assert_eq!(h.blocks.ttl_of(&id), Some(7200));

        let stored = h.users.snapshot(&id).unwrap();
        assert!(stored.is_blocked);
        assert_eq!(stored.blocked_reason.as_deref(), Some("spam"));
        assert_eq!(stored.blocked_by_admin_id.as_deref(), Some("admin-1"));
        assert!(stored.blocked_until.is_some());

        assert!(h.block_service.is_user_blocked(&id).await.unwrap());
        assert!(h.gate.is_blocked(&stored).await);

        let notice = h.email.sent().last().cloned().unwrap();
        assert_eq!(notice.kind, "account_blocked");
        assert_eq!(notice.body, "spam");
        assert!(h.activities.actions().contains(&ActivityAction::UserBlocked));
    }

    #[tokio::test]
    async fn test_permanent_block_uses_registry_retention() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();

        h.block_service
            .block_user(&id, &permanent(), "admin-1", &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(h.blocks.ttl_of(&id), Some(86_400));
        assert!(h.users.snapshot(&id).unwrap().blocked_until.is_none());

        let details = h.block_service.get_blocking_details(&id).await.unwrap();
        assert!(details.permanent);
        assert_eq!(details.reason, "fraud");
    }

    #[tokio::test]
    async fn test_block_rejects_unknown_user_and_bad_duration() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();

        let missing = h
            .block_service
            .block_user("64b7f0c2a1b2c3d4e5f60718", &permanent(), "admin", &ClientInfo::default())
            .await;
        assert!(matches!(missing, Err(AppError::UserNotFound)));

        let too_long = h
            .block_service
            .block_user(&id, &temporary(9000), "admin", &ClientInfo::default())
            .await;
        assert!(matches!(too_long, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_unblock_clears_both_records() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();
        h.block_service
            .block_user(&id, &permanent(), "admin", &ClientInfo::default())
            .await
            .unwrap();

        h.block_service
            .unblock_user(&id, "admin", &ClientInfo::default())
            .await
            .unwrap();

        assert!(!h.block_service.is_user_blocked(&id).await.unwrap());
        assert!(h.blocks.ttl_of(&id).is_none());

        let stored = h.users.snapshot(&id).unwrap();
        assert!(!stored.is_blocked);
        assert!(!h.gate.is_blocked(&stored).await);

        let again = h
            .block_service
            .unblock_user(&id, "admin", &ClientInfo::default())
            .await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_auto_unblock_releases_expired_blocks() {
        let h = Harness::new();
        let expired = h.seed_user("a@x.com", None, None, Role::User).await;
        let active = h.seed_user("b@x.com", None, None, Role::User).await;
        let expired_id = expired.id_string().unwrap();
        let active_id = active.id_string().unwrap();

        h.block_service
            .block_user(&expired_id, &temporary(1), "admin", &ClientInfo::default())
            .await
            .unwrap();
        h.block_service
            .block_user(&active_id, &permanent(), "admin", &ClientInfo::default())
            .await
            .unwrap();

        // 한 시간이 지난 상태를 만듭니다.
        let mut user = h.users.snapshot(&expired_id).unwrap();
        user.blocked_until = Some(DateTime::from_millis(DateTime::now().timestamp_millis() - 1_000));
        h.users.save(&user).await.unwrap();
        let mut record = h.blocks.get(&expired_id).await.unwrap().unwrap();
        record.unblock_at = Some(Utc::now() - Duration::seconds(1));
        h.blocks.put(&record, 1).await.unwrap();

        let released = h.block_service.auto_unblock_expired().await.unwrap();

        assert_eq!(released, 1);
        assert!(!h.users.snapshot(&expired_id).unwrap().is_blocked);
        assert!(h.users.snapshot(&active_id).unwrap().is_blocked);

        let listed = h.block_service.get_all_blocked_users().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_id, active_id);
    }

    #[tokio::test]
    async fn test_admin_cannot_block_self() {
        let h = Harness::new();
        let admin = h.seed_user("root@x.com", None, None, Role::Admin).await;
        let id = admin.id_string().unwrap();

        let result = h
            .block_service
            .block_user(&id, &permanent(), &id, &ClientInfo::default())
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
