//! 차단 레지스트리 레코드
//!
//! Redis에 TTL과 함께 저장되는 휘발성 차단 정보입니다.
//! 시각은 직렬화 형식이 단순한 `chrono::DateTime<Utc>`로 보관합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedUser {
    pub user_id: String,
    pub reason: String,
    pub blocked_by_admin_id: String,
    pub permanent: bool,
    pub blocked_at: DateTime<Utc>,
    /// 임시 차단 해제 시각 (영구 차단이면 `None`)
    pub unblock_at: Option<DateTime<Utc>>,
}

impl BlockedUser {
    /// 영구 차단이거나 해제 시각이 아직 오지 않았으면 활성 상태입니다.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.permanent {
            return true;
        }

        match self.unblock_at {
            Some(unblock_at) => unblock_at > now,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(permanent: bool, unblock_at: Option<DateTime<Utc>>) -> BlockedUser {
        BlockedUser {
            user_id: "u1".into(),
            reason: "spam".into(),
            blocked_by_admin_id: "admin".into(),
            permanent,
            blocked_at: Utc::now(),
            unblock_at,
        }
    }

    #[test]
    fn test_permanent_block_is_always_active() {
        assert!(record(true, None).is_active(Utc::now()));
    }

    #[test]
    fn test_temporary_block_activity_window() {
        let now = Utc::now();

        assert!(record(false, Some(now + Duration::hours(1))).is_active(now));
        assert!(!record(false, Some(now - Duration::seconds(1))).is_active(now));
    }
}
