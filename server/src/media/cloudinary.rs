//! Cloudinary upload API client.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::{MediaError, MediaStore, ResourceType, UploadOptions, UploadedMedia};
use crate::config::CloudinaryConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    width: Option<i32>,
    #[serde(default)]
    height: Option<i32>,
    #[serde(default)]
    format: Option<String>,
    resource_type: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            base_url: API_BASE.to_string(),
        })
    }

    fn endpoint(&self, resource_type: ResourceType, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.config.cloud_name,
            resource_type.as_str(),
            action
        )
    }

    /// Request signature: params sorted by name, joined as `k=v&k=v`, with
    /// the API secret appended, SHA-256 hex encoded.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn error_from(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        MediaError::ApiError { status, message }
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<UploadedMedia, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", options.folder.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);

        let file = reqwest::multipart::Part::bytes(data)
            .file_name("upload")
            .mime_str(&options.content_type)
            .map_err(|e| MediaError::RequestFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", options.folder.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint(ResourceType::Auto, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::ParseError(e.to_string()))?;

        let resource_type = ResourceType::parse(&body.resource_type).ok_or_else(|| {
            MediaError::ParseError(format!("unexpected resource_type '{}'", body.resource_type))
        })?;

        tracing::debug!(
            media_id = %body.public_id,
            resource_type = resource_type.as_str(),
            "Uploaded media to Cloudinary"
        );

        Ok(UploadedMedia {
            url: body.secure_url,
            media_id: body.public_id,
            width: body.width,
            height: body.height,
            format: body.format,
            resource_type,
        })
    }

    async fn destroy(
        &self,
        media_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", media_id), ("timestamp", timestamp.as_str())]);

        let form = [
            ("public_id", media_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.config.api_key.clone()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let response = self
            .client
            .post(self.endpoint(resource_type, "destroy"))
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::ParseError(e.to_string()))?;

        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => Err(MediaError::NotFound(media_id.to_string())),
            other => Err(MediaError::ApiError {
                status: 200,
                message: format!("destroy returned '{}'", other),
            }),
        }
    }

    fn store_name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CloudinaryStore {
        CloudinaryStore::new(
            CloudinaryConfig {
                cloud_name: "demo".to_string(),
                api_key: "key".to_string(),
                api_secret: "abcd".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_sign_sorts_params() {
        let s = store();
        let a = s.sign(&[("timestamp", "1700000000"), ("folder", "potluck/steps")]);
        let b = s.sign(&[("folder", "potluck/steps"), ("timestamp", "1700000000")]);
        assert_eq!(a, b);
        assert_eq!(
            a,
            "bb54ecbb4b898ae9c212368d0762fe9754aeda50906d2f24ce1284ab0b724afa"
        );
    }

    #[test]
    fn test_endpoint() {
        let s = store();
        assert_eq!(
            s.endpoint(ResourceType::Video, "destroy"),
            "https://api.cloudinary.com/v1_1/demo/video/destroy"
        );
    }
}
