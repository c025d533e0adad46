//! 캐싱 계층 모듈
//!
//! Redis 위에 JSON 직렬화를 얹은 얇은 클라이언트를 제공합니다.
//! 차단 레지스트리(`blocked_users:*`)와 사용자 조회 캐시(`user:*`)가 사용합니다.
//!
//! ```bash
//! REDIS_URL=redis://127.0.0.1:6379  # 기본값
//! ```

pub mod redis;
