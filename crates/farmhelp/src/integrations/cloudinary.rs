use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use super::{endpoint, http_client, BoxFuture, IntegrationError};
use crate::config::CloudinaryConfig;

pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";
pub const DEFAULT_UPLOAD_FOLDER: &str = "farmhelp";

/// Hosts farm photos and hands back a public URL.
pub trait ImageHost: Send + Sync {
    fn upload<'a>(
        &'a self,
        filename: &'a str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'a, Result<String, IntegrationError>>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    error: Option<UploadFailure>,
}

#[derive(Debug, Deserialize)]
struct UploadFailure {
    message: String,
}

/// Signed uploads to the Cloudinary image API.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    base_url: String,
    folder: String,
    credentials: Option<CloudinaryConfig>,
}

impl CloudinaryClient {
    pub fn new(credentials: Option<CloudinaryConfig>) -> Result<Self, IntegrationError> {
        Self::with_base_url(credentials, DEFAULT_CLOUDINARY_BASE_URL)
    }

    pub fn with_base_url(
        credentials: Option<CloudinaryConfig>,
        base_url: impl Into<String>,
    ) -> Result<Self, IntegrationError> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into(),
            folder: DEFAULT_UPLOAD_FOLDER.to_string(),
            credentials,
        })
    }

    async fn send(&self, filename: &str, bytes: Vec<u8>) -> Result<String, IntegrationError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(IntegrationError::NotConfigured("cloudinary"))?;

        let timestamp = Utc::now().timestamp();
        let signature = sign(&self.folder, timestamp, &credentials.api_secret);
        let mime = mime_guess::from_path(filename).first_or_octet_stream();

        let file = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())?;
        let form = Form::new()
            .text("api_key", credentials.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", self.folder.clone())
            .text("signature", signature)
            .part("file", file);

        let response = self
            .http
            .post(endpoint(
                &self.base_url,
                &format!("v1_1/{}/image/upload", credentials.cloud_name),
            ))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body: UploadResponse = response.json().await?;

        match body {
            UploadResponse {
                secure_url: Some(url),
                ..
            } => Ok(url),
            UploadResponse {
                error: Some(failure),
                ..
            } => Err(IntegrationError::Api(failure.message)),
            _ => Err(IntegrationError::Api(format!(
                "upload returned {status} without a secure_url"
            ))),
        }
    }
}

impl ImageHost for CloudinaryClient {
    fn upload<'a>(
        &'a self,
        filename: &'a str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'a, Result<String, IntegrationError>> {
        Box::pin(self.send(filename, bytes))
    }
}

/// Request signature: SHA-1 over the sorted signed parameters followed by the API secret.
fn sign(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let payload = format!("folder={folder}&timestamp={timestamp}{api_secret}");
    hex::encode(Sha1::digest(payload.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_covers_folder_and_timestamp() {
        let signature = sign("farmhelp", 1_700_000_000, "secret");
        assert_eq!(signature.len(), 40);
        assert_eq!(signature, sign("farmhelp", 1_700_000_000, "secret"));
        assert_ne!(signature, sign("farmhelp", 1_700_000_001, "secret"));
        assert_ne!(signature, sign("other", 1_700_000_000, "secret"));
    }

    #[tokio::test]
    async fn uploads_fail_without_credentials() {
        let client = CloudinaryClient::new(None).expect("client builds");
        let err = client
            .upload("farm.jpg", vec![0xff, 0xd8])
            .await
            .expect_err("not configured");
        assert!(matches!(err, IntegrationError::NotConfigured("cloudinary")));
    }

    #[test]
    fn error_bodies_are_recognized() {
        let body: UploadResponse =
            serde_json::from_str(r#"{"error": {"message": "Invalid Signature"}}"#)
                .expect("parses");
        assert!(body.secure_url.is_none());
        assert_eq!(body.error.expect("error").message, "Invalid Signature");
    }
}
