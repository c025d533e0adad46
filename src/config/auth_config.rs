//! 인증 관련 설정
//!
//! JWT 서명/만료, OTP 정책, 차단 레지스트리 보관 기간을 환경 변수에서 읽습니다.

use std::env;

use super::env_or;

/// JWT 설정
///
/// | 변수 | 기본값 |
/// |------|--------|
/// | `JWT_SECRET` | 개발용 고정 문자열 (경고 로그) |
/// | `JWT_EXPIRATION_HOURS` | 24 |
/// | `JWT_REFRESH_EXPIRATION_DAYS` | 7 |
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "identity-service-dev-secret".to_string()
        })
    }

    pub fn expiration_hours() -> i64 {
        env_or("JWT_EXPIRATION_HOURS", 24)
    }

    pub fn refresh_expiration_days() -> i64 {
        env_or("JWT_REFRESH_EXPIRATION_DAYS", 7)
    }
}

/// OTP 원장 정책
pub struct OtpConfig;

impl OtpConfig {
    /// 발급된 코드의 유효 시간 (분)
    pub fn expiration_minutes() -> i64 {
        env_or("OTP_EXPIRATION_MINUTES", 5)
    }

    /// 코드당 허용되는 검증 시도 횟수
    pub fn max_attempts() -> i32 {
        env_or("OTP_MAX_ATTEMPTS", 3)
    }

    /// 만료 레코드 정리 주기 (초)
    pub fn cleanup_interval_secs() -> u64 {
        env_or("OTP_CLEANUP_INTERVAL_SECS", 3600)
    }
}

/// 차단 레지스트리 설정
pub struct BlockConfig;

impl BlockConfig {
    /// 영구 차단 레코드의 Redis TTL (초). 영구성 자체는 사용자 문서의 플래그가 보존합니다.
    pub fn registry_ttl_secs() -> u64 {
        env_or("BLOCK_REGISTRY_TTL_SECS", 86_400)
    }

    /// 만료된 임시 차단을 해제하는 주기 (초)
    pub fn sweep_interval_secs() -> u64 {
        env_or("BLOCK_SWEEP_INTERVAL_SECS", 300)
    }
}
