//! Twilio REST API 기반 SMS 발송

use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;

use super::{SmsGateway, templates, with_timeout};
use crate::config::SmsSettings;
use crate::core::errors::{AppError, AppResult};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

pub struct TwilioSms {
    client: reqwest::Client,
    settings: Option<SmsSettings>,
    timeout: Duration,
    otp_ttl_minutes: i64,
}

impl TwilioSms {
    pub fn new(settings: Option<SmsSettings>, timeout: Duration, otp_ttl_minutes: i64) -> Self {
        if settings.is_none() {
            warn!("TWILIO_* 미설정: SMS 발송이 비활성화됩니다");
        }

        Self {
            client: reqwest::Client::new(),
            settings,
            timeout,
            otp_ttl_minutes,
        }
    }

    /// `+`로 시작하지 않는 번호에 기본 국가 코드를 붙입니다.
    fn to_e164(number: &str, default_country_code: &str) -> String {
        let number = number.trim();
        if number.starts_with('+') {
            number.to_string()
        } else {
            format!("{}{}", default_country_code, number)
        }
    }

    async fn send(&self, to: &str, body: &str) -> AppResult<()> {
        let Some(settings) = &self.settings else {
            warn!("SMS 발송이 설정되지 않아 {} 에게 보내지 못했습니다", to);
            return Err(AppError::ExternalServiceError("SMS 발송이 설정되지 않았습니다".to_string()));
        };

        let to = Self::to_e164(to, &settings.default_country_code);
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE,
            urlencoding::encode(&settings.account_sid)
        );

        let resource = with_timeout(self.timeout, "Twilio", async {
            let response = self
                .client
                .post(&url)
                .basic_auth(&settings.account_sid, Some(&settings.auth_token))
                .form(&[
                    ("To", to.as_str()),
                    ("From", settings.from_number.as_str()),
                    ("Body", body),
                ])
                .send()
                .await
                .map_err(|e| AppError::ExternalServiceError(format!("Twilio 요청 실패: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(AppError::ExternalServiceError(format!(
                    "Twilio 응답 오류 {}: {}",
                    status, detail
                )));
            }

            response
                .json::<MessageResource>()
                .await
                .map_err(|e| AppError::ExternalServiceError(format!("Twilio 응답 파싱 실패: {}", e)))
        })
        .await?;

        info!("📱 SMS 발송 완료: {} (SID: {})", to, resource.sid);
        Ok(())
    }
}

#[async_trait]
impl SmsGateway for TwilioSms {
    async fn send_phone_verification_otp(&self, to: &str, otp: &str) -> AppResult<()> {
        self.send(to, &templates::phone_verification_sms(otp, self.otp_ttl_minutes))
            .await
    }

    async fn send_password_reset_otp(&self, to: &str, otp: &str) -> AppResult<()> {
        self.send(to, &templates::password_reset_sms(otp, self.otp_ttl_minutes))
            .await
    }

    async fn send_custom_sms(&self, to: &str, message: &str) -> AppResult<()> {
        self.send(to, message).await
    }
}
