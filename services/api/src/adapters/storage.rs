//! services/api/src/adapters/storage.rs
//!
//! This module contains the blob-storage adapter, implementing the
//! `BlobStorageService` port against a supabase-compatible storage REST API.
//! Uploads are upserts; the returned URL is the public object URL.

use async_trait::async_trait;
use wander_persona_core::ports::{BlobStorageService, PortError, PortResult};

/// Bucket holding AI-generated result images, keyed `ai/{uuid}.png`.
pub const RESULT_IMAGE_BUCKET: &str = "result-images";

/// Bucket holding admin-uploaded branding images, keyed `public/{user_id}/image.jpg`.
pub const BRANDING_IMAGE_BUCKET: &str = "travel-images";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that implements the `BlobStorageService` port.
#[derive(Clone)]
pub struct ObjectStorageAdapter {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl ObjectStorageAdapter {
    /// Creates a new `ObjectStorageAdapter`.
    pub fn new(client: reqwest::Client, base_url: String, service_key: String) -> Self {
        Self {
            client,
            base_url,
            service_key,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}",
            self.base_url.trim_end_matches('/'),
            path
        )
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}",
            self.base_url.trim_end_matches('/'),
            path
        )
    }
}

//=========================================================================================
// `BlobStorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl BlobStorageService for ObjectStorageAdapter {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PortResult<String> {
        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type.to_string())
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("storage upload failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::Unexpected(format!(
                "storage upload returned {}: {}",
                status,
                body.chars().take(300).collect::<String>()
            )));
        }

        Ok(self.public_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_urls_are_derived_from_the_object_path() {
        let adapter = ObjectStorageAdapter::new(
            reqwest::Client::new(),
            "https://storage.example.com/".into(),
            "service-key".into(),
        );
        assert_eq!(
            adapter.public_url("result-images/ai/abc.png"),
            "https://storage.example.com/storage/v1/object/public/result-images/ai/abc.png"
        );
        assert_eq!(
            adapter.object_url("travel-images/public/u1/image.jpg"),
            "https://storage.example.com/storage/v1/object/travel-images/public/u1/image.jpg"
        );
    }
}
