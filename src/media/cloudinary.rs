/// Cloudinary-backed media store
///
/// Talks to the signed upload/destroy REST endpoints with reqwest. Each call
/// is a single request; failures surface immediately to the caller.

use crate::config::{MediaConfig, SignatureAlgorithm};
use crate::media::{MediaError, MediaStore, UploadedAsset};
use async_trait::async_trait;
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Media store that uploads images to a Cloudinary cloud
#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: MediaConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name,
            action
        )
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        folder: &str,
    ) -> Result<UploadedAsset, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        tracing::debug!("📤 Uploading {} bytes ({}) to folder {}", bytes.len(), mime_type, folder);

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name("upload")
            .mime_str(mime_type)?;
        let mut form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);
        if self.config.signature_algorithm == SignatureAlgorithm::Sha256 {
            form = form.text("signature_algorithm", "sha256");
        }

        let response = self.client.post(self.endpoint("upload")).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_upload_response(status, &body, folder)
    }

    async fn delete(&self, asset_id: &str, folder: &str) -> Result<(), MediaError> {
        let public_id = format!("{}/{}", folder, asset_id);
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        tracing::debug!("🗑️ Destroying media asset {}", public_id);

        let mut params = vec![
            ("public_id", public_id.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];
        if self.config.signature_algorithm == SignatureAlgorithm::Sha256 {
            params.push(("signature_algorithm", "sha256"));
        }
        let response = self.client.post(self.endpoint("destroy")).form(&params).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_destroy_response(status, &body)
    }
}

/// Compute a Cloudinary request signature
///
/// Parameters are sorted by name, joined as `k=v&k=v`, suffixed with the
/// API secret and hashed with the account's digest (hex encoded).
fn sign(params: &[(&str, &str)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let payload = format!("{}{}", to_sign, api_secret);
    match algorithm {
        SignatureAlgorithm::Sha1 => format!("{:x}", Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => format!("{:x}", Sha256::digest(payload.as_bytes())),
    }
}

fn rejection(status: u16, body: &str) -> MediaError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    MediaError::Rejected { status, message }
}

fn parse_upload_response(status: u16, body: &str, folder: &str) -> Result<UploadedAsset, MediaError> {
    if !(200..300).contains(&status) {
        return Err(rejection(status, body));
    }

    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|e| MediaError::InvalidResponse(format!("upload response: {}", e)))?;

    let url = parsed
        .secure_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| MediaError::InvalidResponse("upload response has no secure_url".into()))?;
    let public_id = parsed
        .public_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| MediaError::InvalidResponse("upload response has no public_id".into()))?;

    let prefix = format!("{}/", folder);
    let asset_id = match public_id.strip_prefix(&prefix) {
        Some(id) => id.to_string(),
        None => public_id.clone(),
    };

    Ok(UploadedAsset { url, asset_id })
}

fn parse_destroy_response(status: u16, body: &str) -> Result<(), MediaError> {
    if status == 404 {
        return Ok(());
    }
    if !(200..300).contains(&status) {
        return Err(rejection(status, body));
    }

    let parsed: DestroyResponse = serde_json::from_str(body)
        .map_err(|e| MediaError::InvalidResponse(format!("destroy response: {}", e)))?;

    match parsed.result.as_str() {
        "ok" | "not found" => Ok(()),
        other => Err(MediaError::InvalidResponse(format!("destroy result '{}'", other))),
    }
}
