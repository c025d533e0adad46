use serde::{Deserialize, Serialize};

/// 토큰 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT 클레임
///
/// `sub`는 사용자의 로그인 주체(이메일)입니다. 역할과 구독 등급은
/// 발급 시점의 스냅샷이며 갱신 시에만 다시 계산됩니다.
/// `fpr`은 비밀번호 해시/사용자명/역할에서 계산한 지문으로, 이 값이 현재
/// 사용자 상태와 다르면 만료 전이라도 토큰은 무효입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub role: String,
    #[serde(rename = "subscriptionType")]
    pub subscription_type: String,
    pub fpr: String,
    pub typ: TokenType,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}
