//! HTTP-backed photo storage.
//!
//! Posts multipart uploads to the unsigned-upload endpoint of a hosted
//! image service and returns the public URL from the JSON response.
//! Only that URL is ever persisted.

use egram_core::error::{PortalError, PortalResult};
use egram_core::storage::PhotoStore;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Clone)]
pub struct HttpPhotoStore {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl HttpPhotoStore {
    pub fn new(upload_url: String, upload_preset: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url,
            upload_preset,
        }
    }
}

impl PhotoStore for HttpPhotoStore {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> PortalResult<String> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortalError::Storage(e.to_string()))?
            .error_for_status()
            .map_err(|e| PortalError::Storage(e.to_string()))?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| PortalError::Storage(e.to_string()))?;

        body.secure_url
            .ok_or_else(|| PortalError::Storage("upload response missing secure_url".into()))
    }
}
