//! # 아이덴티티 서비스
//!
//! 가입, 로그인, 토큰 갱신, 비밀번호 변경/재설정, 인증 코드 확인을 조립합니다.
//!
//! ## 두 가지 일회용 코드
//!
//! | 흐름 | 저장 위치 | 만료 | 시도 제한 |
//! |------|-----------|------|-----------|
//! | OTP 원장 (`send_otp`, `verify_otp`, 비밀번호 재설정, OTP 로그인) | `otps` 컬렉션 | 정책 TTL | 있음 |
//! | 가입 이메일 인증 (`verify_email`) | 사용자 문서의 코드 슬롯 | 정책 TTL | 없음 |
//!
//! 두 흐름은 서로의 저장소를 보지 않습니다.
//!
//! ## 로그인 실패 응답
//!
//! 식별자 조회 실패와 비밀번호 불일치는 모두 같은 `LoginFailed`입니다.
//! 차단/상태 확인은 비밀번호 확인 뒤에 수행되므로 `USER_BLOCKED`는 올바른
//! 비밀번호를 가진 호출자에게만 드러납니다.
//!
//! ## 로그아웃
//!
//! 발급된 토큰을 서버에 저장하지 않으므로 로그아웃은 활동 기록만 남깁니다.
//! 토큰은 자연 만료까지 유효합니다.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{info, warn};
use mongodb::bson::DateTime;
use validator::Validate;

use super::{PasswordHasher, TokenService};
use crate::core::errors::{AppError, AppResult, UniqueField};
use crate::domain::dto::auth::{
    AuthTokensResponse, GoogleLoginRequest, LoginRequest, LoginWithOtpRequest, MultiLoginRequest, ProfileImagePayload,
    RegisterRequest, ResetPasswordOtpRequest, TokenRefreshResponse,
};
use crate::domain::dto::users::{ChangePasswordRequest, UserResponse};
use crate::domain::entities::activities::ActivityAction;
use crate::domain::entities::otps::OtpPurpose;
use crate::domain::entities::users::{Role, User, UserStatus};
use crate::domain::models::auth::{AuthenticatedUser, ClientInfo};
use crate::domain::models::identifier::{self, Identifier, IdentifierKind};
use crate::domain::models::token::TokenType;
use crate::repositories::UserStore;
use crate::services::activity::ActivityLogger;
use crate::services::blocks::BlockGate;
use crate::services::notifications::{EmailGateway, ImageUpload, ImageUploader};
use crate::services::otp::{OtpPolicy, OtpService, otp_service::codes_match};

const LOGIN_FAILED_LOG: &str = "로그인 실패";

pub struct IdentityService {
    users: Arc<dyn UserStore>,
    otp: Arc<OtpService>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    gate: Arc<BlockGate>,
    email: Arc<dyn EmailGateway>,
    uploader: Arc<dyn ImageUploader>,
    activity: Arc<ActivityLogger>,
    /// 가입 인증 코드 유효 시간에 사용
    policy: OtpPolicy,
}

impl IdentityService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        otp: Arc<OtpService>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        gate: Arc<BlockGate>,
        email: Arc<dyn EmailGateway>,
        uploader: Arc<dyn ImageUploader>,
        activity: Arc<ActivityLogger>,
        policy: OtpPolicy,
    ) -> Self {
        Self {
            users,
            otp,
            tokens,
            hasher,
            gate,
            email,
            uploader,
            activity,
            policy,
        }
    }

    /// 새 계정을 만들고 가입 인증 코드를 메일로 보냅니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(UserResponse)` - 생성된 프로필 (`is_verified == false`)
    /// * `Err(AppError::Duplicate(_))` - 이메일/사용자명/전화번호 중복
    /// * `Err(AppError::ValidationError)` - ADMIN 자가 가입, 잘못된 전화번호 등
    ///
    /// 프로필 이미지 업로드와 인증 메일 발송 실패는 가입을 실패시키지 않습니다.
    pub async fn register(&self, request: RegisterRequest, client: &ClientInfo) -> AppResult<UserResponse> {
        request.validate()?;

        let email = identifier::normalize_email(&request.email);
        let username = request.username.map(|u| u.trim().to_string());
        let phone = match request.phone.as_deref() {
            Some(raw) if identifier::is_phone(raw) => Some(identifier::normalize_phone(raw)),
            Some(_) => {
                return Err(AppError::ValidationError(
                    "유효한 전화번호를 입력해주세요".to_string(),
                ));
            }
            None => None,
        };

        let role = match request.role.as_deref() {
            Some(raw) => Role::parse(raw)?,
            None => Role::User,
        };
        if role == Role::Admin {
            return Err(AppError::ValidationError(
                "관리자 계정은 직접 가입할 수 없습니다".to_string(),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Duplicate(UniqueField::Email));
        }
        if let Some(username) = username.as_deref() {
            if self.users.find_by_username(username).await?.is_some() {
                return Err(AppError::Duplicate(UniqueField::Username));
            }
        }
        if let Some(phone) = phone.as_deref() {
            if self.users.find_by_phone(phone).await?.is_some() {
                return Err(AppError::Duplicate(UniqueField::Phone));
            }
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let mut user = User::new_local(
            email,
            password_hash,
            request.full_name.trim().to_string(),
            username,
            phone,
            role,
        );

        if let Some(image) = request.profile_image {
            user.profile_image_url = self.upload_profile_image(image).await;
        }

        let code = OtpService::generate_code();
        user.reset_password_token = Some(code.clone());
        user.reset_password_expiry = Some(self.minutes_from_now(self.policy.ttl_minutes));

        let user = self.users.insert(user).await?;
        let user_id = user.id_string().unwrap_or_default();

        if let Err(e) = self
            .email
            .send_email_verification_otp(&user.email, &code, &user.full_name)
            .await
        {
            warn!("가입 인증 메일 발송 실패 ({}): {}", user.email, e);
        }

        self.activity
            .log(&user_id, ActivityAction::Register, "회원가입", client)
            .await;

        info!("✅ 회원가입 완료: {} ({})", user.email, user_id);
        Ok(UserResponse::from(user))
    }

    /// 이메일 또는 전화번호 + 비밀번호 로그인
    pub async fn login(&self, request: LoginRequest, client: &ClientInfo) -> AppResult<AuthTokensResponse> {
        request.validate()?;

        let user = match Identifier::parse(&request.identifier) {
            Ok(id) => self.find_by_identifier(&id).await?,
            Err(_) => None,
        };

        let user = self.check_password(user, &request.password, &request.identifier)?;
        self.complete_login(user, client).await
    }

    /// 이메일/사용자명/전화번호 로그인
    ///
    /// `loginType == "otp"`이면 `password`를 PHONE_VERIFICATION 목적의 OTP로 검증합니다.
    pub async fn multi_login(&self, request: MultiLoginRequest, client: &ClientInfo) -> AppResult<AuthTokensResponse> {
        request.validate()?;

        if request.is_otp_login() {
            let verified = self
                .otp
                .verify(&request.login_identifier, &request.password, &OtpPurpose::PhoneVerification)
                .await?;
            if !verified {
                return Err(AppError::InvalidOtp);
            }

            let user = self
                .find_by_any(&request.login_identifier)
                .await?
                .ok_or(AppError::UserNotFound)?;
            return self.complete_login(user, client).await;
        }

        let user = self.find_by_any(&request.login_identifier).await?;
        let user = self.check_password(user, &request.password, &request.login_identifier)?;
        self.complete_login(user, client).await
    }

    /// PHONE_VERIFICATION OTP로 로그인합니다.
    pub async fn login_with_otp(&self, request: LoginWithOtpRequest, client: &ClientInfo) -> AppResult<AuthTokensResponse> {
        request.validate()?;

        let verified = self
            .otp
            .verify(&request.phone_or_email, &request.otp, &OtpPurpose::PhoneVerification)
            .await?;
        if !verified {
            return Err(AppError::InvalidOtp);
        }

        let identifier = Identifier::parse(&request.phone_or_email)?;
        let user = self
            .find_by_identifier(&identifier)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.complete_login(user, client).await
    }

    /// Google 로그인 진입점
    ///
    /// ID 토큰 검증이 연결되기 전까지는 형식만 확인하고 `NotImplemented`를 돌려줍니다.
    pub async fn google_login(&self, request: GoogleLoginRequest) -> AppResult<AuthTokensResponse> {
        request.validate()?;

        info!("Google 로그인 요청 거부 (미지원): {:?}", request.email);
        Err(AppError::NotImplemented(
            "Google 로그인은 아직 지원하지 않습니다".to_string(),
        ))
    }

    /// refresh 토큰으로 새 토큰 쌍을 발급합니다.
    ///
    /// 발급 이후 비밀번호, 사용자명, 역할이 바뀌었다면 `InvalidToken`입니다.
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenRefreshResponse> {
        let claims = self.tokens.decode_as(refresh_token, TokenType::Refresh)?;

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !TokenService::claims_match(&claims, &user) {
            warn!("토큰 지문 불일치로 갱신 거부: {}", claims.sub);
            return Err(AppError::InvalidToken);
        }

        self.ensure_can_sign_in(&user).await?;

        let pair = self.tokens.generate_token_pair(&user)?;
        info!("🔄 토큰 갱신: {}", user.email);
        Ok(TokenRefreshResponse::from(pair))
    }

    /// 활동 기록만 남깁니다. 토큰은 만료 시까지 유효합니다.
    pub async fn logout(&self, access_token: &str, client: &ClientInfo) -> AppResult<()> {
        let principal = self.tokens.extract_principal(access_token)?;

        match self.users.find_by_email(&principal).await {
            Ok(Some(user)) => {
                let user_id = user.id_string().unwrap_or_default();
                self.activity
                    .log(&user_id, ActivityAction::Logout, "로그아웃", client)
                    .await;
            }
            Ok(None) => warn!("로그아웃 주체를 찾을 수 없습니다: {}", principal),
            Err(e) => warn!("로그아웃 기록 중 사용자 조회 실패 ({}): {}", principal, e),
        }

        info!("👋 로그아웃: {}", principal);
        Ok(())
    }

    /// 현재 비밀번호 확인 후 새 비밀번호로 교체합니다.
    ///
    /// 비밀번호 해시가 바뀌므로 이전에 발급된 토큰은 모두 무효가 됩니다.
    pub async fn change_password(
        &self,
        user_id: &str,
        request: ChangePasswordRequest,
        client: &ClientInfo,
    ) -> AppResult<()> {
        request.validate()?;

        let mut user = self.load_user(user_id).await?;
        if !self.hasher.verify(&request.current_password, &user.password_hash)? {
            return Err(AppError::InvalidPassword);
        }

        user.password_hash = self.hasher.hash(&request.new_password)?;
        user.touch();
        self.users.save(&user).await?;

        self.activity
            .log(user_id, ActivityAction::PasswordChange, "비밀번호 변경", client)
            .await;

        info!("🔑 비밀번호 변경: {}", user.email);
        Ok(())
    }

    /// 비밀번호 재설정 OTP를 보냅니다.
    pub async fn forgot_password(&self, phone_or_email: &str) -> AppResult<()> {
        self.send_otp(phone_or_email, OtpPurpose::PasswordReset.as_str()).await
    }

    /// PASSWORD_RESET OTP를 확인하고 새 비밀번호를 설정합니다.
    pub async fn reset_password_with_otp(
        &self,
        request: ResetPasswordOtpRequest,
        client: &ClientInfo,
    ) -> AppResult<()> {
        request.validate()?;

        let verified = self
            .otp
            .verify(&request.phone_or_email, &request.otp, &OtpPurpose::PasswordReset)
            .await?;
        if !verified {
            return Err(AppError::InvalidOtp);
        }

        let identifier = Identifier::parse(&request.phone_or_email)?;
        let mut user = self
            .find_by_identifier(&identifier)
            .await?
            .ok_or(AppError::UserNotFound)?;

        user.password_hash = self.hasher.hash(&request.new_password)?;
        user.touch();
        self.users.save(&user).await?;

        let user_id = user.id_string().unwrap_or_default();
        self.activity
            .log(&user_id, ActivityAction::PasswordReset, "OTP 비밀번호 재설정", client)
            .await;

        info!("🔑 비밀번호 재설정: {}", user.email);
        Ok(())
    }

    /// 범용 OTP 발송. 전송 실패는 `OtpSendFailed`입니다.
    pub async fn send_otp(&self, phone_or_email: &str, purpose: &str) -> AppResult<()> {
        let purpose = OtpPurpose::from(purpose);

        if self.otp.send(phone_or_email, &purpose).await? {
            Ok(())
        } else {
            Err(AppError::OtpSendFailed)
        }
    }

    pub async fn verify_otp(&self, phone_or_email: &str, otp: &str, purpose: &str) -> AppResult<bool> {
        self.otp
            .verify(phone_or_email, otp, &OtpPurpose::from(purpose))
            .await
    }

    /// 가입 시 사용자 문서에 저장한 코드로 이메일을 인증합니다.
    ///
    /// OTP 원장과 무관하며 시도 횟수를 세지 않습니다.
    ///
    /// # Errors
    ///
    /// * `UserNotFound` - 사용자 없음
    /// * `InvalidOtp` - 저장된 코드가 없거나 불일치
    /// * `OtpExpired` - 코드 만료
    pub async fn verify_email(&self, user_id: &str, otp: &str, client: &ClientInfo) -> AppResult<UserResponse> {
        let mut user = self.load_user(user_id).await?;

        let Some(stored) = user.reset_password_token.as_deref() else {
            return Err(AppError::InvalidOtp);
        };

        let expired = user
            .reset_password_expiry
            .map(|expiry| DateTime::now() > expiry)
            .unwrap_or(true);
        if expired {
            return Err(AppError::OtpExpired);
        }

        if !codes_match(otp.trim(), stored) {
            return Err(AppError::InvalidOtp);
        }

        user.is_verified = true;
        user.email_verified = true;
        user.reset_password_token = None;
        user.reset_password_expiry = None;
        user.touch();
        self.users.save(&user).await?;

        self.activity
            .log(user_id, ActivityAction::EmailVerified, "이메일 인증", client)
            .await;

        info!("📧 이메일 인증 완료: {}", user.email);
        Ok(UserResponse::from(user))
    }

    /// 등록된 전화번호로 받은 PHONE_VERIFICATION OTP를 확인합니다.
    pub async fn verify_phone_number(&self, user_id: &str, otp: &str, client: &ClientInfo) -> AppResult<UserResponse> {
        let mut user = self.load_user(user_id).await?;

        let Some(phone) = user.phone.clone() else {
            return Err(AppError::ValidationError(
                "등록된 전화번호가 없습니다".to_string(),
            ));
        };

        if !self
            .otp
            .verify(&phone, otp, &OtpPurpose::PhoneVerification)
            .await?
        {
            return Err(AppError::InvalidOtp);
        }

        user.phone_verified = true;
        user.touch();
        self.users.save(&user).await?;

        self.activity
            .log(user_id, ActivityAction::PhoneVerified, "전화번호 인증", client)
            .await;

        info!("📱 전화번호 인증 완료: {}", phone);
        Ok(UserResponse::from(user))
    }

    pub fn validate_token(&self, token: &str, user: &User) -> bool {
        self.tokens.validate_token(token, user)
    }

    pub fn extract_principal_from_token(&self, token: &str) -> AppResult<String> {
        self.tokens.extract_principal(token)
    }

    /// 사용자 플래그와 차단 레지스트리를 모두 확인합니다.
    pub async fn is_blocked(&self, user_id: &str) -> AppResult<bool> {
        let user = self.load_user(user_id).await?;
        Ok(self.gate.is_blocked(&user).await)
    }

    /// access 토큰으로 요청 주체를 확인합니다. 인증 미들웨어가 사용합니다.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.tokens.decode_as(access_token, TokenType::Access)?;

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !TokenService::claims_match(&claims, &user) {
            return Err(AppError::InvalidToken);
        }

        self.ensure_can_sign_in(&user).await?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            email: user.email,
            role: user.role,
        })
    }

    async fn load_user(&self, user_id: &str) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    async fn find_by_identifier(&self, identifier: &Identifier) -> AppResult<Option<User>> {
        match identifier.kind {
            IdentifierKind::Email => self.users.find_by_email(&identifier.value).await,
            IdentifierKind::Phone => self.users.find_by_phone(&identifier.value).await,
        }
    }

    /// 이메일 → 전화번호 → 사용자명 순서로 조회합니다.
    async fn find_by_any(&self, raw: &str) -> AppResult<Option<User>> {
        let trimmed = raw.trim();

        if let Ok(identifier) = Identifier::parse(trimmed) {
            if let Some(user) = self.find_by_identifier(&identifier).await? {
                return Ok(Some(user));
            }
            if identifier.is_email() {
                return Ok(None);
            }
        }

        self.users.find_by_username(trimmed).await
    }

    fn check_password(&self, user: Option<User>, password: &str, attempted: &str) -> AppResult<User> {
        let Some(user) = user else {
            warn!("{}: 존재하지 않는 식별자 {}", LOGIN_FAILED_LOG, attempted.trim());
            return Err(AppError::LoginFailed);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!("{}: 비밀번호 불일치 {}", LOGIN_FAILED_LOG, user.email);
            return Err(AppError::LoginFailed);
        }

        Ok(user)
    }

    async fn ensure_can_sign_in(&self, user: &User) -> AppResult<()> {
        if user.status != UserStatus::Active {
            return Err(AppError::AuthenticationError(format!(
                "사용할 수 없는 계정 상태입니다: {}",
                user.status.as_str()
            )));
        }

        self.gate.check(user).await
    }

    async fn complete_login(&self, mut user: User, client: &ClientInfo) -> AppResult<AuthTokensResponse> {
        self.ensure_can_sign_in(&user).await?;

        user.last_login_at = Some(DateTime::now());
        user.touch();
        self.users.save(&user).await?;

        let pair = self.tokens.generate_token_pair(&user)?;
        let user_id = user.id_string().unwrap_or_default();

        self.activity
            .log(&user_id, ActivityAction::Login, "로그인", client)
            .await;

        info!("🔐 로그인 성공: {}", user.email);
        Ok(AuthTokensResponse::new(pair, UserResponse::from(user)))
    }

    async fn upload_profile_image(&self, image: ProfileImagePayload) -> Option<String> {
        let bytes = match STANDARD.decode(image.data.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("프로필 이미지 디코딩 실패, 건너뜁니다: {}", e);
                return None;
            }
        };

        let upload = ImageUpload {
            file_name: image.file_name,
            content_type: image
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes,
        };

        match self.uploader.upload(upload).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("프로필 이미지 업로드 실패, 이미지 없이 가입합니다: {}", e);
                None
            }
        }
    }

    fn minutes_from_now(&self, minutes: i64) -> DateTime {
        DateTime::from_millis(DateTime::now().timestamp_millis() + minutes * 60_000)
    }
}
