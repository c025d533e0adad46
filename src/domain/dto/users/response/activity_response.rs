//! 활동 기록 응답

use serde::Serialize;

use crate::domain::entities::activities::{ActivityAction, UserActivity};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: Option<String>,
    pub action: ActivityAction,
    pub details: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: String,
}

impl From<UserActivity> for ActivityResponse {
    fn from(activity: UserActivity) -> Self {
        Self {
            id: activity.id.map(|id| id.to_hex()),
            action: activity.action,
            details: activity.details,
            ip_address: activity.ip_address,
            user_agent: activity.user_agent,
            timestamp: activity.created_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}
