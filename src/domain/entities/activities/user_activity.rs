use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 감사 로그에 남기는 아이덴티티 변경 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Register,
    Login,
    Logout,
    PasswordChange,
    PasswordReset,
    EmailVerified,
    PhoneVerified,
    UserBlocked,
    UserUnblocked,
    StatusChanged,
    ProfileUpdated,
}

/// `user_activities` 컬렉션 문서
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub feature_name: String,
    pub action: ActivityAction,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime,
}
