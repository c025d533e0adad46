//! 애플리케이션 컨텍스트
//!
//! 시작 시 모든 서비스를 한 번 조립하고, `web::Data<AppContext>`로 핸들러와
//! 미들웨어에 전달합니다. 전역 레지스트리는 두지 않습니다.
//!
//! ```text
//! Database ──┬── UserRepository ──────┐
//!            ├── OtpRepository ───────┼── OtpService ──┐
//!            └── ActivityRepository ──┼── ActivityLogger
//! RedisClient ── RedisBlockRegistry ──┼── BlockGate ───┼── IdentityService
//!                                     └── BlockService │
//! SmtpMailer / TwilioSms / CloudinaryUploader ─────────┘
//! ```

use std::sync::Arc;

use log::info;

use crate::caching::redis::RedisClient;
use crate::config::{BlockConfig, NotificationConfig};
use crate::core::errors::AppResult;
use crate::db::Database;
use crate::repositories::{
    ActivityRepository, OtpRepository, RedisBlockRegistry, UserRepository,
};
use crate::services::activity::ActivityLogger;
use crate::services::auth::{IdentityService, PasswordHasher, TokenService, TokenSettings};
use crate::services::blocks::{BlockGate, BlockService};
use crate::services::notifications::{
    CloudinaryUploader, DisabledUploader, ImageUploader, SmtpMailer, TwilioSms,
};
use crate::services::otp::{OtpPolicy, OtpService};
use crate::services::users::UserService;

#[derive(Clone)]
pub struct AppContext {
    pub identity: Arc<IdentityService>,
    pub users: Arc<UserService>,
    pub blocks: Arc<BlockService>,
    pub otp: Arc<OtpService>,
}

impl AppContext {
    /// 저장소 인덱스를 보장하고 운영 구현으로 서비스 그래프를 만듭니다.
    pub async fn from_infrastructure(database: Arc<Database>, redis: Arc<RedisClient>) -> AppResult<Self> {
        let user_repo = Arc::new(UserRepository::new(database.clone(), redis.clone()));
        let otp_repo = Arc::new(OtpRepository::new(database.clone()));
        let activity_repo = Arc::new(ActivityRepository::new(database));
        let block_registry = Arc::new(RedisBlockRegistry::new(redis));

        user_repo.create_indexes().await?;
        otp_repo.create_indexes().await?;
        activity_repo.create_indexes().await?;
        info!("✅ 컬렉션 인덱스 확인 완료");

        let policy = OtpPolicy::from_env();
        let timeout = NotificationConfig::gateway_timeout();

        let email = Arc::new(SmtpMailer::new(
            NotificationConfig::email(),
            timeout,
            policy.ttl_minutes,
        ));
        let sms = Arc::new(TwilioSms::new(
            NotificationConfig::sms(),
            timeout,
            policy.ttl_minutes,
        ));
        let uploader: Arc<dyn ImageUploader> = match NotificationConfig::upload() {
            Some(settings) => Arc::new(CloudinaryUploader::new(settings, timeout)),
            None => {
                log::warn!("CLOUDINARY_* 미설정: 프로필 이미지 업로드가 비활성화됩니다");
                Arc::new(DisabledUploader)
            }
        };

        let activity = Arc::new(ActivityLogger::new(activity_repo));
        let otp = Arc::new(OtpService::new(otp_repo, email.clone(), sms, policy));
        let gate = Arc::new(BlockGate::new(block_registry.clone()));
        let tokens = Arc::new(TokenService::new(TokenSettings::from_env()));

        let identity = Arc::new(IdentityService::new(
            user_repo.clone(),
            otp.clone(),
            tokens,
            PasswordHasher::from_env(),
            gate,
            email.clone(),
            uploader,
            activity.clone(),
            policy,
        ));
        let users = Arc::new(UserService::new(user_repo.clone(), activity.clone()));
        let blocks = Arc::new(BlockService::new(
            user_repo,
            block_registry,
            email,
            activity,
            BlockConfig::registry_ttl_secs(),
        ));

        Ok(Self {
            identity,
            users,
            blocks,
            otp,
        })
    }
}
