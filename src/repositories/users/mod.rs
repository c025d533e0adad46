//! 자격 증명 저장소
//!
//! 이메일은 항상 유일하고, 사용자명과 전화번호는 값이 있을 때만 유일합니다.
//! 조회 키는 호출 전에 정규화되어 있어야 합니다 (이메일 소문자, 전화번호 구분자 제거).

pub mod user_repo;

pub use user_repo::UserRepository;

use async_trait::async_trait;
use mongodb::bson::DateTime;

use crate::core::errors::AppResult;
use crate::domain::entities::users::User;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// 형식이 잘못된 id는 에러가 아니라 `None`입니다.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>>;

    /// 새 사용자를 저장하고 id가 채워진 사용자를 돌려줍니다.
    ///
    /// 유니크 제약 위반은 `AppError::Duplicate`로 보고됩니다.
    async fn insert(&self, user: User) -> AppResult<User>;

    /// 기존 사용자 문서를 통째로 교체합니다.
    async fn save(&self, user: &User) -> AppResult<()>;

    /// `blocked_until`이 `now` 이전인 차단 사용자 목록
    async fn find_expired_blocks(&self, now: DateTime) -> AppResult<Vec<User>>;
}
