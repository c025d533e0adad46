//! 서비스/핸들러 테스트 공용 도구
//!
//! 발송 내용을 기록하는 게이트웨이와, 메모리 저장소로 조립한 [`Harness`]를 제공합니다.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::context::AppContext;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::{Role, User};
use crate::repositories::memory::{
    MemoryActivityStore, MemoryBlockStore, MemoryOtpStore, MemoryUserStore,
};
use crate::repositories::UserStore;
use crate::services::auth::{IdentityService, PasswordHasher, TokenService, TokenSettings};
use crate::services::blocks::{BlockGate, BlockService};
use crate::services::notifications::{EmailGateway, ImageUpload, ImageUploader, SmsGateway};
use crate::services::otp::{OtpPolicy, OtpService};
use crate::services::activity::ActivityLogger;
use crate::services::users::UserService;

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub kind: &'static str,
    pub code: Option<String>,
    pub body: String,
}

fn digits_of(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits.len() == 6).then_some(digits)
}

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<bool>,
}

impl Outbox {
    fn record(&self, to: &str, kind: &'static str, code: Option<String>, body: &str) -> AppResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::ExternalServiceError("gateway offline".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_string(),
            kind,
            code,
            body: body.to_string(),
        });
        Ok(())
    }

    fn last_code(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to && m.code.is_some())
            .and_then(|m| m.code.clone())
    }
}

#[derive(Default)]
pub struct RecordingEmail {
    outbox: Outbox,
}

impl RecordingEmail {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbox.sent.lock().unwrap().clone()
    }

    pub fn last_code(&self, to: &str) -> Option<String> {
        self.outbox.last_code(to)
    }

    pub fn set_failing(&self, failing: bool) {
        *self.outbox.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl EmailGateway for RecordingEmail {
    async fn send_email_verification_otp(&self, to: &str, otp: &str, name: &str) -> AppResult<()> {
        self.outbox.record(to, "email_verification", Some(otp.to_string()), name)
    }

    async fn send_password_reset_otp(&self, to: &str, otp: &str, name: &str) -> AppResult<()> {
        self.outbox.record(to, "password_reset", Some(otp.to_string()), name)
    }

    async fn send_account_blocked_email(&self, to: &str, _name: &str, reason: &str) -> AppResult<()> {
        self.outbox.record(to, "account_blocked", None, reason)
    }

    async fn send_custom_email(&self, to: &str, _subject: &str, body: &str) -> AppResult<()> {
        self.outbox.record(to, "custom", digits_of(body), body)
    }
}

#[derive(Default)]
pub struct RecordingSms {
    outbox: Outbox,
}

impl RecordingSms {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbox.sent.lock().unwrap().clone()
    }

    pub fn last_code(&self, to: &str) -> Option<String> {
        self.outbox.last_code(to)
    }

    pub fn set_failing(&self, failing: bool) {
        *self.outbox.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl SmsGateway for RecordingSms {
    async fn send_phone_verification_otp(&self, to: &str, otp: &str) -> AppResult<()> {
        self.outbox.record(to, "phone_verification", Some(otp.to_string()), otp)
    }

    async fn send_password_reset_otp(&self, to: &str, otp: &str) -> AppResult<()> {
        self.outbox.record(to, "password_reset", Some(otp.to_string()), otp)
    }

    async fn send_custom_sms(&self, to: &str, message: &str) -> AppResult<()> {
        self.outbox.record(to, "custom", digits_of(message), message)
    }
}

/// 업로드 요청을 기록하고 고정 URL을 돌려주거나 실패합니다.
#[derive(Default)]
pub struct RecordingUploader {
    uploads: Mutex<Vec<String>>,
    failing: Mutex<bool>,
}

impl RecordingUploader {
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageUploader for RecordingUploader {
    async fn upload(&self, image: ImageUpload) -> AppResult<String> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::ExternalServiceError("upload offline".to_string()));
        }
        self.uploads.lock().unwrap().push(image.file_name.clone());
        Ok(format!("https://images.test/{}", image.file_name))
    }
}

pub const TEST_PASSWORD: &str = "P@ssw0rd1";

/// 메모리 저장소와 기록용 게이트웨이로 조립한 전체 서비스 그래프
pub struct Harness {
    pub users: Arc<MemoryUserStore>,
    pub otps: Arc<MemoryOtpStore>,
    pub activities: Arc<MemoryActivityStore>,
    pub blocks: Arc<MemoryBlockStore>,
    pub email: Arc<RecordingEmail>,
    pub sms: Arc<RecordingSms>,
    pub uploader: Arc<RecordingUploader>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub otp: Arc<OtpService>,
    pub gate: Arc<BlockGate>,
    pub identity: Arc<IdentityService>,
    pub user_service: Arc<UserService>,
    pub block_service: Arc<BlockService>,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let otps = Arc::new(MemoryOtpStore::default());
        let activities = Arc::new(MemoryActivityStore::default());
        let blocks = Arc::new(MemoryBlockStore::default());
        let email = Arc::new(RecordingEmail::default());
        let sms = Arc::new(RecordingSms::default());
        let uploader = Arc::new(RecordingUploader::default());

        let tokens = Arc::new(TokenService::new(TokenSettings {
            secret: "harness-secret".to_string(),
            access_ttl_hours: 1,
            refresh_ttl_days: 7,
        }));
        let hasher = PasswordHasher::new(4);
        let activity = Arc::new(ActivityLogger::new(activities.clone()));
        let otp = Arc::new(OtpService::new(
            otps.clone(),
            email.clone(),
            sms.clone(),
            OtpPolicy::default(),
        ));
        let gate = Arc::new(BlockGate::new(blocks.clone()));

        let identity = Arc::new(IdentityService::new(
            users.clone(),
            otp.clone(),
            tokens.clone(),
            hasher,
            gate.clone(),
            email.clone(),
            uploader.clone(),
            activity.clone(),
            OtpPolicy::default(),
        ));
        let user_service = Arc::new(UserService::new(users.clone(), activity.clone()));
        let block_service = Arc::new(BlockService::new(
            users.clone(),
            blocks.clone(),
            email.clone(),
            activity,
            86_400,
        ));

        Self {
            users,
            otps,
            activities,
            blocks,
            email,
            sms,
            uploader,
            tokens,
            hasher,
            otp,
            gate,
            identity,
            user_service,
            block_service,
        }
    }

    /// 비밀번호 `TEST_PASSWORD`를 가진 사용자를 바로 저장합니다.
    pub async fn seed_user(&self, email: &str, username: Option<&str>, phone: Option<&str>, role: Role) -> User {
        let user = User::new_local(
            email.to_string(),
            self.hasher.hash(TEST_PASSWORD).unwrap(),
            "Test User".to_string(),
            username.map(str::to_string),
            phone.map(str::to_string),
            role,
        );
        self.users.insert(user).await.unwrap()
    }

    pub fn context(&self) -> AppContext {
        AppContext {
            identity: self.identity.clone(),
            users: self.user_service.clone(),
            blocks: self.block_service.clone(),
            otp: self.otp.clone(),
        }
    }
}
