//! JWT 토큰 관리 서비스 구현
//!
//! HS256으로 서명한 액세스/리프레시 토큰을 발급하고 검증합니다.
//! 서버에 발급 토큰을 저장하지 않으므로, 토큰은 만료 전까지 유효합니다.
//! 대신 `fpr` 지문 클레임이 현재 사용자 상태(비밀번호 해시, 사용자명, 역할)와
//! 어긋나면 만료 전이라도 검증에 실패합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::User;
use crate::domain::models::token::{TokenClaims, TokenPair, TokenType};

/// 서명 키와 두 가지 만료 주기
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_ttl_hours: i64,
    pub refresh_ttl_days: i64,
}

impl TokenSettings {
    pub fn from_env() -> Self {
        Self {
            secret: JwtConfig::secret(),
            access_ttl_hours: JwtConfig::expiration_hours(),
            refresh_ttl_days: JwtConfig::refresh_expiration_days(),
        }
    }
}

pub struct TokenService {
    settings: TokenSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(settings: TokenSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        Self {
            settings,
            encoding_key,
            decoding_key,
        }
    }

    /// 비밀번호 해시, 사용자명, 역할로 계산한 사용자 상태 지문 (hex SHA-256)
    pub fn fingerprint(user: &User) -> String {
        let mut hasher = Sha256::new();
        hasher.update(user.password_hash.as_bytes());
        hasher.update([0x1f]);
        hasher.update(user.username.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0x1f]);
        hasher.update(user.role.as_str().as_bytes());

        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }

    fn mint(&self, user: &User, typ: TokenType) -> AppResult<String> {
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let now = Utc::now();
        let expiration = match typ {
            TokenType::Access => now + Duration::hours(self.settings.access_ttl_hours),
            TokenType::Refresh => now + Duration::days(self.settings.refresh_ttl_days),
        };

        let claims = TokenClaims {
            sub: user.email.clone(),
            user_id,
            role: user.role.as_str().to_string(),
            subscription_type: user.subscription_type().to_string(),
            fpr: Self::fingerprint(user),
            typ,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    pub fn generate_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.mint(user, TokenType::Access)?,
            refresh_token: self.mint(user, TokenType::Refresh)?,
            expires_in: self.settings.access_ttl_hours * 3600,
        })
    }

    /// 서명과 만료를 확인하고 클레임을 돌려줍니다.
    ///
    /// 형식 오류, 서명 불일치, 만료는 모두 `InvalidToken`입니다.
    pub fn decode(&self, token: &str) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("토큰 검증 실패: {}", e);
                AppError::InvalidToken
            })
    }

    /// `decode` 후 토큰 용도까지 확인합니다.
    pub fn decode_as(&self, token: &str, expected: TokenType) -> AppResult<TokenClaims> {
        let claims = self.decode(token)?;
        if claims.typ != expected {
            log::debug!("토큰 용도 불일치: {:?} (기대값 {:?})", claims.typ, expected);
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    /// 토큰의 로그인 주체(이메일)
    pub fn extract_principal(&self, token: &str) -> AppResult<String> {
        Ok(self.decode(token)?.sub)
    }

    /// 클레임이 현재 사용자 상태와 일치하는지 확인합니다.
    pub fn claims_match(claims: &TokenClaims, user: &User) -> bool {
        claims.sub == user.email
            && Some(claims.user_id.as_str()) == user.id_string().as_deref()
            && claims.role == user.role.as_str()
            && claims.fpr == Self::fingerprint(user)
    }

    /// 서명/만료/지문을 모두 확인합니다.
    pub fn validate_token(&self, token: &str, user: &User) -> bool {
        self.decode(token)
            .map(|claims| Self::claims_match(&claims, user))
            .unwrap_or(false)
    }

    pub fn extract_bearer_token<'a>(auth_header: &'a str) -> AppResult<&'a str> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AppError::AuthenticationError(
                "유효하지 않은 인증 헤더 형식입니다".to_string(),
            )),
        }
    }
}
