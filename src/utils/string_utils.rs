//! # 문자열 유틸리티
//!
//! 요청 바디 정리와 로그 마스킹에 쓰는 작은 함수들입니다.

use serde::Deserialize;

/// 공백만 있는 선택 문자열을 `None`으로 바꾸고, 나머지는 trim합니다.
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::clean_optional_string;
///
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// assert_eq!(clean_optional_string(None), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// 빈 문자열, 공백, null은 모두 `None`이 됩니다. 폼에서 빈 값으로 넘어온
/// `username`/`phone`이 중복 검사나 유니크 인덱스에 걸리지 않게 합니다.
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct RegisterRequest {
///     #[serde(default, deserialize_with = "deserialize_optional_string")]
///     username: Option<String>,
/// }
///
/// // {"username": "  alice  "} → Some("alice")
/// // {"username": ""}          → None
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 로그용으로 이메일/전화번호 일부를 가립니다.
///
/// - 이메일: 로컬 파트 첫 글자만 남김 (`a***@example.com`)
/// - 그 외: 마지막 4자만 남김 (`********3210`)
pub fn mask_contact(value: &str) -> String {
    if let Some((local, domain)) = value.split_once('@') {
        let first: String = local.chars().take(1).collect();
        return format!("{}***@{}", first, domain);
    }

    let chars: Vec<char> = value.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;

    let mut masked = "*".repeat(hidden);
    masked.extend(&chars[hidden..]);
    masked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("Hello".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(Some("\t\n".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Form {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            username: Option<String>,
        }

        let form: Form = serde_json::from_str(r#"{"username": "  홍길동  "}"#).unwrap();
        assert_eq!(form.username.as_deref(), Some("홍길동"));

        let form: Form = serde_json::from_str(r#"{"username": "   "}"#).unwrap();
        assert_eq!(form.username, None);

        let form: Form = serde_json::from_str(r#"{"username": null}"#).unwrap();
        assert_eq!(form.username, None);

        let form: Form = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(form.username, None);
    }

    #[test]
    fn test_mask_contact() {
        assert_eq!(mask_contact("alice@example.com"), "a***@example.com");
        assert_eq!(mask_contact("+919876543210"), "*********3210");
        assert_eq!(mask_contact("123"), "123");
    }
}
