//! Cloudinary 이미지 업로드 (unsigned preset)

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::info;
use serde::Deserialize;

use super::{ImageUpload, ImageUploader, with_timeout};
use crate::config::UploadSettings;
use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
}

pub struct CloudinaryUploader {
    client: reqwest::Client,
    settings: UploadSettings,
    timeout: Duration,
}

impl CloudinaryUploader {
    pub fn new(settings: UploadSettings, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
            timeout,
        }
    }

    fn data_uri(image: &ImageUpload) -> String {
        format!("data:{};base64,{}", image.content_type, STANDARD.encode(&image.bytes))
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, image: ImageUpload) -> AppResult<String> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            urlencoding::encode(&self.settings.cloud_name)
        );
        let file = Self::data_uri(&image);

        let result = with_timeout(self.timeout, "Cloudinary", async {
            let response = self
                .client
                .post(&url)
                .form(&[
                    ("file", file.as_str()),
                    ("upload_preset", self.settings.upload_preset.as_str()),
                    ("folder", "profile_images"),
                ])
                .send()
                .await
                .map_err(|e| AppError::ExternalServiceError(format!("이미지 업로드 요청 실패: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(AppError::ExternalServiceError(format!(
                    "이미지 업로드 응답 오류: {}",
                    status
                )));
            }

            response
                .json::<UploadResult>()
                .await
                .map_err(|e| AppError::ExternalServiceError(format!("업로드 응답 파싱 실패: {}", e)))
        })
        .await?;

        info!("🖼️ 프로필 이미지 업로드 완료: {}", image.file_name);
        Ok(result.secure_url)
    }
}

/// 업로드 설정이 없을 때 사용하는 구현. 항상 실패를 보고합니다.
pub struct DisabledUploader;

#[async_trait]
impl ImageUploader for DisabledUploader {
    async fn upload(&self, image: ImageUpload) -> AppResult<String> {
        Err(AppError::ExternalServiceError(format!(
            "이미지 업로드가 설정되지 않았습니다 ({})",
            image.file_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_encoding() {
        let image = ImageUpload {
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            bytes: b"hi".to_vec(),
        };

        assert_eq!(CloudinaryUploader::data_uri(&image), "data:image/png;base64,aGk=");
    }
}
