//! # 계정 관리 서비스
//!
//! 프로필 조회/수정, 활동 기록 조회, 관리자 상태 변경을 담당합니다.
//! 계정은 물리 삭제하지 않고 `INACTIVE` 상태로 전환합니다.

use std::sync::Arc;

use log::info;
use validator::Validate;

use crate::core::errors::{AppError, AppResult, UniqueField};
use crate::domain::dto::users::{ActivityResponse, UpdateProfileRequest, UserResponse};
use crate::domain::entities::activities::ActivityAction;
use crate::domain::entities::users::{User, UserStatus};
use crate::domain::models::auth::ClientInfo;
use crate::domain::models::identifier;
use crate::repositories::UserStore;
use crate::services::activity::ActivityLogger;

const DEFAULT_ACTIVITY_LIMIT: i64 = 20;
const MAX_ACTIVITY_LIMIT: i64 = 100;

pub struct UserService {
    users: Arc<dyn UserStore>,
    activity: Arc<ActivityLogger>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, activity: Arc<ActivityLogger>) -> Self {
        Self { users, activity }
    }

    async fn load_user(&self, user_id: &str) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// ID로 프로필을 조회합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::UserNotFound` - 사용자가 없거나 ID 형식이 잘못된 경우
    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserResponse> {
        let user = self.load_user(user_id).await?;
        Ok(UserResponse::from(user))
    }

    /// 이름, 전화번호, 프로필 이미지 URL을 수정합니다.
    ///
    /// 전화번호가 바뀌면 `phone_verified`가 해제됩니다. 토큰 지문에 들어가는
    /// 필드는 건드리지 않으므로 기존 토큰은 그대로 유효합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidInput` / `AppError::ValidationError` - 형식 오류, 빈 요청
    /// * `AppError::Duplicate(UniqueField::Phone)` - 다른 계정이 쓰는 전화번호
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
        client: &ClientInfo,
    ) -> AppResult<UserResponse> {
        request.validate()?;
        if request.is_empty() {
            return Err(AppError::ValidationError(
                "수정할 항목이 없습니다".to_string(),
            ));
        }

        let mut user = self.load_user(user_id).await?;
        let mut changed = Vec::new();

        if let Some(full_name) = request.full_name {
            user.full_name = full_name;
            changed.push("fullName");
        }

        if let Some(raw) = request.phone.as_deref() {
            if !identifier::is_phone(raw) {
                return Err(AppError::ValidationError(
                    "유효한 전화번호를 입력해주세요".to_string(),
                ));
            }

            let phone = identifier::normalize_phone(raw);
            if user.phone.as_deref() != Some(phone.as_str()) {
                if let Some(owner) = self.users.find_by_phone(&phone).await? {
                    if owner.id != user.id {
                        return Err(AppError::Duplicate(UniqueField::Phone));
                    }
                }
                user.phone = Some(phone);
                user.phone_verified = false;
                changed.push("phone");
            }
        }

        if let Some(url) = request.profile_image_url {
            user.profile_image_url = Some(url);
            changed.push("profileImageUrl");
        }

        user.touch();
        self.users.save(&user).await?;

        self.activity
            .log(user_id, ActivityAction::ProfileUpdated, changed.join(", "), client)
            .await;

        info!("👤 프로필 수정: {} ({})", user.email, changed.join(", "));
        Ok(UserResponse::from(user))
    }

    /// 최근 활동 기록 (최신순)
    ///
    /// `limit`이 없으면 20건, 1-100 범위로 보정합니다.
    pub async fn recent_activity(&self, user_id: &str, limit: Option<i64>) -> AppResult<Vec<ActivityResponse>> {
        self.load_user(user_id).await?;

        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        let activities = self.activity.recent(user_id, limit).await?;

        Ok(activities.into_iter().map(ActivityResponse::from).collect())
    }

    /// 계정 상태를 바꿉니다. `is_active`는 `status == ACTIVE`와 항상 같습니다.
    ///
    /// `admin_id`가 없으면 사용자 본인의 변경으로 기록합니다.
    pub async fn update_user_status(
        &self,
        user_id: &str,
        status: UserStatus,
        admin_id: Option<&str>,
        client: &ClientInfo,
    ) -> AppResult<UserResponse> {
        let mut user = self.load_user(user_id).await?;
        let previous = user.status;

        user.set_status(status);
        self.users.save(&user).await?;

        let details = match admin_id {
            Some(admin_id) => format!(
                "{} → {} (관리자 {})",
                previous.as_str(),
                status.as_str(),
                admin_id
            ),
            None => format!("{} → {}", previous.as_str(), status.as_str()),
        };
        self.activity
            .log(user_id, ActivityAction::StatusChanged, details, client)
            .await;

        info!("👤 계정 상태 변경: {} {} → {}", user.email, previous.as_str(), status.as_str());
        Ok(UserResponse::from(user))
    }

    /// 본인 계정 탈퇴 (INACTIVE 전환)
    pub async fn deactivate_user(&self, user_id: &str, client: &ClientInfo) -> AppResult<()> {
        self.update_user_status(user_id, UserStatus::Inactive, None, client)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::Role;
    use crate::test_support::Harness;

    #[tokio::test]
    async fn test_get_profile_and_missing_user() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", Some("alice"), None, Role::User).await;
        let id = user.id_string().unwrap();

        let profile = h.user_service.get_profile(&id).await.unwrap();
        assert_eq!(profile.username.as_deref(), Some("alice"));

        let missing = h.user_service.get_profile("not-an-object-id").await;
        assert!(matches!(missing, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_status_change_tracks_active_flag_and_logs() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();

        let suspended = h
            .user_service
            .update_user_status(&id, UserStatus::Suspended, Some("admin"), &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(suspended.status, UserStatus::Suspended);
        assert!(!suspended.is_active);
        assert!(h.activities.actions().contains(&ActivityAction::StatusChanged));
    }

    #[tokio::test]
    async fn test_update_profile_changes_only_sent_fields() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", Some("alice"), Some("+15551234567"), Role::User).await;
        let id = user.id_string().unwrap();
        let mut verified = h.users.snapshot(&id).unwrap();
        verified.phone_verified = true;
        h.users.save(&verified).await.unwrap();

        let request = UpdateProfileRequest {
            full_name: Some("Alice Kim".into()),
            phone: Some("+1 (555) 987-6543".into()),
            profile_image_url: None,
        };
        let profile = h
            .user_service
            .update_profile(&id, request, &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(profile.full_name, "Alice Kim");
        assert_eq!(profile.phone.as_deref(), Some("+15559876543"));
        assert!(!profile.phone_verified);
        assert_eq!(profile.username.as_deref(), Some("alice"));
        assert!(h.activities.actions().contains(&ActivityAction::ProfileUpdated));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_phone_and_empty_body() {
        let h = Harness::new();
        h.seed_user("b@x.com", None, Some("+15550000000"), Role::User).await;
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();

        let taken = UpdateProfileRequest {
            phone: Some("+15550000000".into()),
            ..Default::default()
        };
        let result = h
            .user_service
            .update_profile(&id, taken, &ClientInfo::default())
            .await;
        assert!(matches!(result, Err(AppError::Duplicate(UniqueField::Phone))));

        let empty = h
            .user_service
            .update_profile(&id, UpdateProfileRequest::default(), &ClientInfo::default())
            .await;
        assert!(matches!(empty, Err(AppError::ValidationError(_))));
        assert!(h.users.snapshot(&id).unwrap().phone.is_none());
    }

    #[tokio::test]
    async fn test_recent_activity_is_newest_first_and_limited() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();

        for status in [UserStatus::Suspended, UserStatus::Active, UserStatus::Suspended] {
            h.user_service
                .update_user_status(&id, status, Some("admin"), &ClientInfo::default())
                .await
                .unwrap();
        }

        let all = h.user_service.recent_activity(&id, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].details.starts_with("ACTIVE → SUSPENDED"));

        let one = h.user_service.recent_activity(&id, Some(0)).await.unwrap();
        assert_eq!(one.len(), 1);

        let missing = h.user_service.recent_activity("not-an-object-id", None).await;
        assert!(matches!(missing, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_deactivate_is_soft_delete() {
        let h = Harness::new();
        let user = h.seed_user("a@x.com", None, None, Role::User).await;
        let id = user.id_string().unwrap();

        h.user_service
            .deactivate_user(&id, &ClientInfo::default())
            .await
            .unwrap();

        let stored = h.users.snapshot(&id).unwrap();
        assert_eq!(stored.status, UserStatus::Inactive);
        assert!(!stored.is_active);
    }
}
