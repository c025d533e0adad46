//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 선택 문자열 정리, 로그 마스킹
//! - [`display_terminal`] - 서버 시작 배너

pub mod display_terminal;
pub mod string_utils;
