//! 로그인/OTP 식별자 분류
//!
//! OTP 전달 채널은 식별자가 이메일인지 전화번호인지로 결정됩니다.
//! 전화번호는 공백, 하이픈, 괄호를 제거한 뒤 E.164 형태로 검사합니다.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::AppError;

/// 가입과 로그인이 함께 쓰는 이메일 형식
pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]?[1-9]\d{1,14}$").expect("phone pattern"));

static PHONE_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-()]").expect("phone separator pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Phone,
}

/// 정규화가 끝난 식별자
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub value: String,
}

impl Identifier {
    /// 식별자를 분류하고 저장용 형태로 정규화합니다.
    ///
    /// 이메일은 소문자로, 전화번호는 구분 문자를 제거한 형태로 바뀝니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 이메일도 전화번호도 아닌 경우
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();

        if is_email(trimmed) {
            return Ok(Self {
                kind: IdentifierKind::Email,
                value: normalize_email(trimmed),
            });
        }

        if is_phone(trimmed) {
            return Ok(Self {
                kind: IdentifierKind::Phone,
                value: normalize_phone(trimmed),
            });
        }

        Err(AppError::ValidationError(
            "유효한 이메일 또는 전화번호를 입력해주세요".to_string(),
        ))
    }

    pub fn is_email(&self) -> bool {
        self.kind == IdentifierKind::Email
    }
}

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

pub fn is_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(&normalize_phone(value))
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn normalize_phone(value: &str) -> String {
    PHONE_SEPARATORS.replace_all(value.trim(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_classification() {
        let id = Identifier::parse("  Alice@Example.COM ").unwrap();

        assert_eq!(id.kind, IdentifierKind::Email);
        assert_eq!(id.value, "alice@example.com");
    }

    #[test]
    fn test_phone_classification_strips_separators() {
        let id = Identifier::parse("+1 (555) 123-4567").unwrap();

        assert_eq!(id.kind, IdentifierKind::Phone);
        assert_eq!(id.value, "+15551234567");
    }

    #[test]
    fn test_malformed_identifiers_are_rejected() {
        assert!(Identifier::parse("").is_err());
        assert!(Identifier::parse("alice").is_err());
        assert!(Identifier::parse("alice@localhost").is_err());
        assert!(Identifier::parse("o'brien@x.com").is_err());
        assert!(Identifier::parse("0123456").is_err());
        assert!(Identifier::parse("+1234567890123456").is_err());
    }
}
