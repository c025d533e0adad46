//! 차단 게이트와 관리자 차단 서비스
//!
//! - [`BlockGate`]: 인증이 필요한 모든 요청 전에 호출되는 판정기
//! - [`BlockService`]: 관리자 차단/해제, 조회, 만료 차단 자동 해제

pub mod block_gate;
pub mod block_service;

pub use block_gate::BlockGate;
pub use block_service::BlockService;
