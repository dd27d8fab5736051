use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::{error, info};

use renoprop_core::config::StorageConfig;

use crate::store::{ObjectStore, StorageError};

/// Google Cloud Storage upload client.
///
/// Uploads use the JSON API media endpoint with a pre-issued bearer token;
/// token issuance is the deployment's concern, not this client's. There is
/// no retry policy here: a failed upload surfaces immediately and leaves
/// no object behind (GCS media uploads are atomic per request).
#[derive(Clone, Debug)]
pub struct GcsClient {
    client: Client,
    endpoint: String,
    bucket: String,
    access_token: String,
}

impl GcsClient {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let access_token = config
            .access_token
            .as_ref()
            .map(|token| token.expose_secret().trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| StorageError::Auth { key: config.object_name.clone() })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| StorageError::Transport {
                key: String::new(),
                message: format!("http client construction failed: {err}"),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            access_token,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload_url(&self, key: &str) -> String {
        format!(
            "{endpoint}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={name}",
            endpoint = self.endpoint,
            bucket = percent_encode(&self.bucket),
            name = percent_encode(key),
        )
    }

    fn map_status(&self, key: &str, status: StatusCode, body: String) -> StorageError {
        match status {
            StatusCode::UNAUTHORIZED => StorageError::Auth { key: key.to_string() },
            StatusCode::FORBIDDEN => StorageError::PermissionDenied {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            },
            StatusCode::NOT_FOUND => StorageError::BucketNotFound { bucket: self.bucket.clone() },
            _ => StorageError::Rejected { key: key.to_string(), status: status.as_u16(), body },
        }
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = self.upload_url(key);
        let size = bytes.len();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|err| StorageError::Transport {
                key: key.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            info!(bucket = %self.bucket, object = %key, bytes = size, "object uploaded");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let mapped = self.map_status(key, status, body);
        error!(bucket = %self.bucket, object = %key, status = status.as_u16(), error = %mapped, "object upload failed");
        Err(mapped)
    }
}

/// Minimal percent-encoding for bucket names and flat object keys in a
/// URL query/path position.
fn percent_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use renoprop_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use super::{percent_encode, GcsClient};
    use crate::store::StorageError;
    use reqwest::StatusCode;

    fn client_fixture() -> GcsClient {
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                bucket: Some("renovation-bucket".to_string()),
                storage_access_token: Some("ya29.token".to_string()),
                llm_api_key: Some("AIza-key".to_string()),
                storage_endpoint: Some("https://storage.googleapis.com/".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("fixture config should validate");

        GcsClient::new(&config.storage).expect("client should build")
    }

    #[test]
    fn upload_url_targets_media_endpoint_with_object_name() {
        let client = client_fixture();
        let url = client.upload_url("proposal_document_for_user.pdf");
        assert_eq!(
            url,
            "https://storage.googleapis.com/upload/storage/v1/b/renovation-bucket/o\
             ?uploadType=media&name=proposal_document_for_user.pdf"
        );
    }

    #[test]
    fn status_codes_map_onto_the_error_taxonomy() {
        let client = client_fixture();

        let auth = client.map_status("k", StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(auth, StorageError::Auth { .. }));

        let denied = client.map_status("k", StatusCode::FORBIDDEN, String::new());
        assert!(
            matches!(denied, StorageError::PermissionDenied { ref bucket, .. } if bucket == "renovation-bucket")
        );

        let missing = client.map_status("k", StatusCode::NOT_FOUND, String::new());
        assert!(matches!(missing, StorageError::BucketNotFound { .. }));

        let other = client.map_status("k", StatusCode::SERVICE_UNAVAILABLE, "busy".to_string());
        assert!(matches!(other, StorageError::Rejected { status: 503, .. }));
    }

    #[test]
    fn missing_access_token_fails_construction() {
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                bucket: Some("renovation-bucket".to_string()),
                storage_access_token: Some("ya29.token".to_string()),
                llm_api_key: Some("AIza-key".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("fixture config should validate");

        let mut storage = config.storage;
        storage.access_token = None;
        let error = GcsClient::new(&storage).expect_err("tokenless client must not build");
        assert!(matches!(error, StorageError::Auth { .. }));
    }

    #[test]
    fn percent_encoding_covers_reserved_characters() {
        assert_eq!(percent_encode("plain-name_1.pdf"), "plain-name_1.pdf");
        assert_eq!(percent_encode("has space&sign"), "has%20space%26sign");
    }
}
