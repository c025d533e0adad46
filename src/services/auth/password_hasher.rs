//! bcrypt 비밀번호 해싱

use crate::config::PasswordConfig;
use crate::core::errors::{AppResult, ErrorContext};

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// `BCRYPT_COST` 또는 실행 환경별 기본 cost
    pub fn from_env() -> Self {
        Self::new(PasswordConfig::bcrypt_cost())
    }

    pub fn hash(&self, password: &str) -> AppResult<String> {
        let started = std::time::Instant::now();
        let hashed = bcrypt::hash(password, self.cost).context("비밀번호 해싱 실패")?;
        log::debug!("Password hashing took: {:?}", started.elapsed());

        Ok(hashed)
    }

    /// 저장된 해시와 비교합니다. 해시 형식이 깨져 있으면 내부 오류입니다.
    pub fn verify(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        bcrypt::verify(password, password_hash).context("비밀번호 검증 실패")
    }
}
