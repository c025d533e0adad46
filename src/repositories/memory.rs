//! 테스트용 메모리 저장소
//!
//! 운영 구현과 같은 유니크 제약을 흉내 내므로 서비스 테스트가 충돌 경로까지 검증할 수 있습니다.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{DateTime, oid::ObjectId};

use super::{ActivityStore, BlockStore, OtpInsert, OtpStore, UserStore};
use crate::core::errors::{AppError, AppResult, UniqueField};
use crate::domain::entities::activities::{ActivityAction, UserActivity};
use crate::domain::entities::blocks::BlockedUser;
use crate::domain::entities::otps::{OtpPurpose, OtpVerification};
use crate::domain::entities::users::User;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn snapshot(&self, id: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id_string().as_deref() == Some(id))
            .cloned()
    }

    fn conflict(existing: &[User], user: &User) -> Option<UniqueField> {
        let others = existing.iter().filter(|u| u.id.is_none() || u.id != user.id);

        for other in others {
            if other.email == user.email {
                return Some(UniqueField::Email);
            }
            if user.username.is_some() && other.username == user.username {
                return Some(UniqueField::Username);
            }
            if user.phone.is_some() && other.phone == user.phone {
                return Some(UniqueField::Phone);
            }
        }
        None
    }

    fn find_where(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.snapshot(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_where(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.find_where(|u| u.username.as_deref() == Some(username)))
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        Ok(self.find_where(|u| u.phone.as_deref() == Some(phone)))
    }

    async fn insert(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        user.id = None;
        if let Some(field) = Self::conflict(&users, &user) {
            return Err(AppError::Duplicate(field));
        }

        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(field) = Self::conflict(&users, user) {
            return Err(AppError::Duplicate(field));
        }

        let slot = users
            .iter_mut()
            .find(|u| u.id.is_some() && u.id == user.id)
            .ok_or(AppError::UserNotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn find_expired_blocks(&self, now: DateTime) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.is_blocked && u.blocked_until.map(|t| t <= now).unwrap_or(false))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryOtpStore {
    records: Mutex<Vec<OtpVerification>>,
    /// 남은 횟수만큼 `insert`가 동시 삽입 충돌을 보고합니다.
    forced_duplicates: Mutex<u32>,
    /// 남은 횟수만큼 조건부 쓰기 직전에 다른 검증이 시도 한 번을 먼저 기록합니다.
    rival_attempts: Mutex<u32>,
}

impl MemoryOtpStore {
    pub fn all(&self) -> Vec<OtpVerification> {
        self.records.lock().unwrap().clone()
    }

    pub fn pending_count(&self, phone_or_email: &str, purpose: &OtpPurpose) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.verified && r.phone_or_email == phone_or_email && &r.purpose == purpose)
            .count()
    }

    /// 모든 레코드의 만료 시각을 과거로 옮깁니다.
    pub fn expire_all(&self) {
        let past = DateTime::from_millis(DateTime::now().timestamp_millis() - 1_000);
        for record in self.records.lock().unwrap().iter_mut() {
            record.expires_at = past;
        }
    }

    pub fn force_duplicates(&self, times: u32) {
        *self.forced_duplicates.lock().unwrap() = times;
    }

    pub fn race_next_writes(&self, times: u32) {
        *self.rival_attempts.lock().unwrap() = times;
    }

    fn apply_rival_attempt(&self, records: &mut [OtpVerification], id: &ObjectId) {
        let mut rival = self.rival_attempts.lock().unwrap();
        if *rival == 0 {
            return;
        }
        *rival -= 1;

        if let Some(slot) = records.iter_mut().find(|r| &r.id == id) {
            slot.attempts += 1;
            slot.version += 1;
        }
    }

    fn is_key(record: &OtpVerification, phone_or_email: &str, purpose: &OtpPurpose) -> bool {
        !record.verified && record.phone_or_email == phone_or_email && &record.purpose == purpose
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn delete_pending(&self, phone_or_email: &str, purpose: &OtpPurpose) -> AppResult<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !Self::is_key(r, phone_or_email, purpose));
        Ok((before - records.len()) as u64)
    }

    async fn find_pending(
        &self,
        phone_or_email: &str,
        purpose: &OtpPurpose,
    ) -> AppResult<Option<OtpVerification>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| Self::is_key(r, phone_or_email, purpose))
            .cloned())
    }

    async fn insert(&self, record: &OtpVerification) -> AppResult<OtpInsert> {
        {
            let mut forced = self.forced_duplicates.lock().unwrap();
            if *forced > 0 {
                *forced -= 1;
                return Ok(OtpInsert::Duplicate);
            }
        }

        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| Self::is_key(r, &record.phone_or_email, &record.purpose))
        {
            return Ok(OtpInsert::Duplicate);
        }

        records.push(record.clone());
        Ok(OtpInsert::Inserted)
    }

    async fn replace_if_version(
        &self,
        record: &OtpVerification,
        expected_version: i64,
    ) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();
        self.apply_rival_attempt(&mut records, &record.id);

        match records
            .iter_mut()
            .find(|r| r.id == record.id && r.version == expected_version)
        {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_if_version(&self, id: &ObjectId, expected_version: i64) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();
        self.apply_rival_attempt(&mut records, id);

        let before = records.len();
        records.retain(|r| !(&r.id == id && r.version == expected_version));
        Ok(records.len() < before)
    }

    async fn delete_expired(&self, now: DateTime) -> AppResult<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.expires_at >= now);
        Ok((before - records.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryActivityStore {
    activities: Mutex<Vec<UserActivity>>,
    failing: Mutex<bool>,
}

impl MemoryActivityStore {
    pub fn actions(&self) -> Vec<ActivityAction> {
        self.activities
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.action)
            .collect()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn insert(&self, activity: &UserActivity) -> AppResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::DatabaseError("activity store offline".to_string()));
        }
        self.activities.lock().unwrap().push(activity.clone());
        Ok(())
    }

    async fn find_recent_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<UserActivity>> {
        let mut found: Vec<UserActivity> = self
            .activities
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }
}

#[derive(Default)]
pub struct MemoryBlockStore {
    records: Mutex<HashMap<String, (BlockedUser, u64)>>,
}

impl MemoryBlockStore {
    pub fn ttl_of(&self, user_id: &str) -> Option<u64> {
        self.records.lock().unwrap().get(user_id).map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn put(&self, record: &BlockedUser, ttl_secs: u64) -> AppResult<()> {
        self.records
            .lock()
            .unwrap()
            .insert(record.user_id.clone(), (record.clone(), ttl_secs));
        Ok(())
    }

    async fn get(&self, user_id: &str) -> AppResult<Option<BlockedUser>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(user_id)
            .map(|(record, _)| record.clone()))
    }

    async fn remove(&self, user_id: &str) -> AppResult<()> {
        self.records.lock().unwrap().remove(user_id);
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<BlockedUser>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .map(|(record, _)| record.clone())
            .collect())
    }
}
