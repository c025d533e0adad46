//! 데이터 액세스 계층
//!
//! 저장소마다 `async_trait` 기반 trait을 두고, 운영 구현(MongoDB/Redis)과
//! 테스트용 메모리 구현이 같은 계약을 따릅니다. 서비스는 `Arc<dyn ...Store>`만 압니다.
//!
//! | Trait | 운영 구현 | 저장 위치 |
//! |-------|-----------|-----------|
//! | [`UserStore`] | [`UserRepository`] | MongoDB `users` (+ Redis `user:{id}` 캐시) |
//! | [`OtpStore`] | [`OtpRepository`] | MongoDB `otps` |
//! | [`ActivityStore`] | [`ActivityRepository`] | MongoDB `user_activities` |
//! | [`BlockStore`] | [`RedisBlockRegistry`] | Redis `blocked_users:{userId}` |

pub mod activities;
pub mod blocks;
pub mod otps;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use activities::{ActivityRepository, ActivityStore};
pub use blocks::{BlockStore, RedisBlockRegistry};
pub use otps::{OtpInsert, OtpRepository, OtpStore};
pub use users::{UserRepository, UserStore};

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// 유니크 인덱스 위반이면 서버가 돌려준 메시지를 반환합니다.
///
/// 메시지에는 위반한 인덱스 이름이 포함되어 있어 어떤 필드가 충돌했는지 판별할 수 있습니다.
pub(crate) fn duplicate_key_message(error: &MongoError) -> Option<&str> {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            Some(write_error.message.as_str())
        }
        _ => None,
    }
}
