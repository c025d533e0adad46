//! # 외부 발송/업로드 게이트웨이
//!
//! 핵심 로직은 아래 세 trait만 알고, 실제 전송 수단은 시작 시 주입됩니다.
//!
//! | Trait | 운영 구현 | 설정 누락 시 |
//! |-------|-----------|--------------|
//! | [`EmailGateway`] | [`SmtpMailer`] (lettre) | 모든 발송이 실패로 보고됨 |
//! | [`SmsGateway`] | [`TwilioSms`] (reqwest) | 모든 발송이 실패로 보고됨 |
//! | [`ImageUploader`] | [`CloudinaryUploader`] (reqwest) | [`DisabledUploader`] |
//!
//! 모든 원격 호출은 `GATEWAY_TIMEOUT_SECS` 안에 끝나야 하며, 시간 초과는 실패입니다.
//! 발송 실패를 치명적으로 볼지는 호출하는 쪽이 결정합니다.

pub mod cloudinary_uploader;
pub mod smtp_mailer;
pub mod templates;
pub mod twilio_sms;

pub use cloudinary_uploader::{CloudinaryUploader, DisabledUploader};
pub use smtp_mailer::SmtpMailer;
pub use twilio_sms::TwilioSms;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::errors::{AppError, AppResult};

#[async_trait]
pub trait EmailGateway: Send + Sync {
    async fn send_email_verification_otp(&self, to: &str, otp: &str, name: &str) -> AppResult<()>;

    async fn send_password_reset_otp(&self, to: &str, otp: &str, name: &str) -> AppResult<()>;

    async fn send_account_blocked_email(&self, to: &str, name: &str, reason: &str) -> AppResult<()>;

    async fn send_custom_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send_phone_verification_otp(&self, to: &str, otp: &str) -> AppResult<()>;

    async fn send_password_reset_otp(&self, to: &str, otp: &str) -> AppResult<()>;

    async fn send_custom_sms(&self, to: &str, message: &str) -> AppResult<()>;
}

/// 업로드할 이미지 원본
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// 업로드 후 공개 URL을 돌려줍니다.
    async fn upload(&self, image: ImageUpload) -> AppResult<String>;
}

/// 원격 호출을 `limit` 안에 끝내도록 감쌉니다.
pub(crate) async fn with_timeout<T, F>(limit: Duration, channel: &str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::ExternalServiceError(format!(
            "{} 응답 시간 초과 ({}초)",
            channel,
            limit.as_secs()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_reports_slow_calls_as_failures() {
        let result: AppResult<()> = with_timeout(Duration::from_millis(10), "SMS", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_through_results() {
        let ok = with_timeout(Duration::from_secs(1), "SMTP", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: AppResult<()> = with_timeout(Duration::from_secs(1), "SMTP", async {
            Err(AppError::ExternalServiceError("rejected".into()))
        })
        .await;
        assert!(err.is_err());
    }
}
