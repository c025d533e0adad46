//! SMTP 메일 발송 (lettre)

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, Message, header::ContentType};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use log::{info, warn};

use super::{EmailGateway, templates, with_timeout};
use crate::config::EmailSettings;
use crate::core::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
    timeout: Duration,
    otp_ttl_minutes: i64,
}

impl SmtpMailer {
    /// 설정이 없거나 잘못되었으면 경고만 남기고 비활성 상태로 생성됩니다.
    pub fn new(settings: Option<EmailSettings>, timeout: Duration, otp_ttl_minutes: i64) -> Self {
        let (transport, from) = match settings {
            Some(settings) => Self::build_transport(&settings),
            None => {
                warn!("SMTP_URL/MAIL_FROM 미설정: 이메일 발송이 비활성화됩니다");
                (None, None)
            }
        };

        Self {
            transport,
            from,
            timeout,
            otp_ttl_minutes,
        }
    }

    fn build_transport(
        settings: &EmailSettings,
    ) -> (Option<AsyncSmtpTransport<Tokio1Executor>>, Option<Mailbox>) {
        let transport = match AsyncSmtpTransport::<Tokio1Executor>::from_url(&settings.smtp_url) {
            Ok(builder) => Some(builder.build()),
            Err(e) => {
                warn!("SMTP_URL 파싱 실패, 이메일 발송 비활성화: {}", e);
                None
            }
        };

        let from = match settings.from_address.parse::<Mailbox>() {
            Ok(mailbox) => Some(mailbox),
            Err(e) => {
                warn!("MAIL_FROM 주소가 올바르지 않습니다 ({}): {}", settings.from_address, e);
                None
            }
        };

        (transport, from)
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some() && self.from.is_some()
    }

    async fn send_html(&self, to: &str, subject: &str, html: String) -> AppResult<()> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            warn!("이메일 발송이 설정되지 않아 {} 에게 보내지 못했습니다", to);
            return Err(AppError::ExternalServiceError("이메일 발송이 설정되지 않았습니다".to_string()));
        };

        let recipient = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::ExternalServiceError(format!("수신 주소 오류: {}", e)))?;

        let message = Message::builder()
            .from(from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::ExternalServiceError(format!("메일 생성 실패: {}", e)))?;

        with_timeout(self.timeout, "SMTP", async {
            transport
                .send(message)
                .await
                .map_err(|e| AppError::ExternalServiceError(format!("메일 발송 실패: {}", e)))
        })
        .await?;

        info!("📧 메일 발송 완료: {} ({})", to, subject);
        Ok(())
    }
}

#[async_trait]
impl EmailGateway for SmtpMailer {
    async fn send_email_verification_otp(&self, to: &str, otp: &str, name: &str) -> AppResult<()> {
        let (subject, html) = templates::email_verification(name, otp, self.otp_ttl_minutes);
        self.send_html(to, &subject, html).await
    }

    async fn send_password_reset_otp(&self, to: &str, otp: &str, name: &str) -> AppResult<()> {
        let (subject, html) = templates::password_reset(name, otp, self.otp_ttl_minutes);
        self.send_html(to, &subject, html).await
    }

    async fn send_account_blocked_email(&self, to: &str, name: &str, reason: &str) -> AppResult<()> {
        let (subject, html) = templates::account_blocked(name, reason);
        self.send_html(to, &subject, html).await
    }

    async fn send_custom_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.send_html(to, subject, body.to_string()).await
    }
}
