//! Cloudinary object storage adapter
//!
//! Uses the signed upload and destroy endpoints of the Cloudinary REST API.
//! Requests are signed over the sorted parameter string followed by the API
//! secret. Cloudinary accounts sign with SHA-1 unless switched to SHA-256.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::payment::{ObjectMetadata, ObjectStorage, StoredObject};
use crate::domain::DomainError;

const PROVIDER: &str = "cloudinary";
const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com";

/// Digest used for request signatures; must match the account setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

/// Cloudinary credentials and options
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Optional folder prepended to every public ID
    pub folder: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub signature_algorithm: SignatureAlgorithm,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[hidden]")
            .field("folder", &self.folder)
            .field("base_url", &self.base_url)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            signature_algorithm: SignatureAlgorithm::default(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        let folder = folder.into();
        self.folder = (!folder.trim().is_empty()).then(|| folder.trim_matches('/').to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = algorithm;
        self
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    bytes: u64,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Cloudinary-backed object storage
#[derive(Debug, Clone)]
pub struct CloudinaryStorage {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Result<Self, DomainError> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            return Err(DomainError::configuration(
                "Cloudinary requires cloud_name, api_key and api_secret",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.config.base_url, self.config.cloud_name, action
        )
    }

    fn public_id(&self, key: &str) -> String {
        match &self.config.folder {
            Some(folder) => format!("{}/{}", folder, key),
            None => key.to_string(),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::dependency(PROVIDER, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::dependency(
                PROVIDER,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        Ok(response)
    }
}

/// Hex digest of `k1=v1&k2=v2...` (keys sorted) followed by the secret
pub fn sign_params(
    params: &BTreeMap<&str, String>,
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => digest_hex::<Sha1>(&to_sign, api_secret),
        SignatureAlgorithm::Sha256 => digest_hex::<Sha256>(&to_sign, api_secret),
    }
}

fn digest_hex<D: Digest>(to_sign: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cloudinary contextual metadata: `key=value` pairs joined by `|`
fn context_string(metadata: &ObjectMetadata) -> String {
    metadata
        .iter()
        .map(|(key, value)| format!("{}={}", key, value.replace(['|', '='], "")))
        .collect::<Vec<_>>()
        .join("|")
}

#[async_trait]
impl ObjectStorage for CloudinaryStorage {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn put(
        &self,
        bytes: Bytes,
        key: &str,
        metadata: &ObjectMetadata,
    ) -> Result<StoredObject, DomainError> {
        let public_id = self.public_id(key);
        let timestamp = Utc::now().timestamp().to_string();

        let mut params = BTreeMap::from([
            ("public_id", public_id.clone()),
            ("timestamp", timestamp.clone()),
        ]);

        if !metadata.is_empty() {
            params.insert("context", context_string(metadata));
        }

        let signature = sign_params(
            &params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let file = Part::bytes(bytes.to_vec())
            .file_name(format!("{}.webp", key.rsplit('/').next().unwrap_or(key)))
            .mime_str("image/webp")
            .map_err(|e| DomainError::internal(format!("Invalid upload MIME type: {}", e)))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);

        for (name, value) in params {
            form = form.text(name, value);
        }

        debug!(public_id = %public_id, bytes = bytes.len(), "Uploading to Cloudinary");

        let response = self
            .send(self.client.post(self.endpoint("upload")).multipart(form))
            .await?;

        let body: UploadResponse = response.json().await.map_err(|e| {
            DomainError::dependency(PROVIDER, format!("Failed to parse upload response: {}", e))
        })?;

        Ok(StoredObject {
            url: body.secure_url,
            handle: body.public_id,
            stored_byte_size: body.bytes,
        })
    }

    async fn delete(&self, handle: &str) -> Result<bool, DomainError> {
        let timestamp = Utc::now().timestamp().to_string();

        let params = BTreeMap::from([
            ("public_id", handle.to_string()),
            ("timestamp", timestamp),
        ]);
        let signature = sign_params(
            &params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let mut form: Vec<(&str, String)> = params.into_iter().collect();
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));

        let response = self
            .send(self.client.post(self.endpoint("destroy")).form(&form))
            .await?;

        let body: DestroyResponse = response.json().await.map_err(|e| {
            DomainError::dependency(PROVIDER, format!("Failed to parse destroy response: {}", e))
        })?;

        Ok(body.result == "ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn storage(server: &MockServer) -> CloudinaryStorage {
        CloudinaryStorage::new(
            CloudinaryConfig::new("demo", "key-123", "secret-xyz").with_base_url(server.uri()),
        )
        .unwrap()
    }

    fn sample_params() -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("timestamp", "1315060510".to_string()),
            ("public_id", "sample".to_string()),
        ])
    }

    #[test]
    fn test_sign_params_sha1_known_value() {
        assert_eq!(
            sign_params(&sample_params(), "abcd", SignatureAlgorithm::Sha1),
            "c3470533147774275dd37996cc4d0e68fd03cd4f"
        );
    }

    #[test]
    fn test_sign_params_sha256_known_value() {
        assert_eq!(
            sign_params(&sample_params(), "abcd", SignatureAlgorithm::Sha256),
            "0d4fe14b2b4a3f68a97ccc5097c43908b623d24293c296826a9390c14d891509"
        );
    }

    #[test]
    fn test_default_signature_is_sha1() {
        let config = CloudinaryConfig::new("demo", "key", "secret");
        assert_eq!(config.signature_algorithm, SignatureAlgorithm::Sha1);
    }

    #[test]
    fn test_context_string() {
        let metadata = ObjectMetadata::from([
            ("team_id".to_string(), "abc".to_string()),
            ("format".to_string(), "webp".to_string()),
        ]);

        assert_eq!(context_string(&metadata), "format=webp|team_id=abc");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = CloudinaryStorage::new(CloudinaryConfig::new("demo", "", "secret"));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = CloudinaryConfig::new("demo", "key", "very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
    }

    #[tokio::test]
    async fn test_upload_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .and(body_string_contains("name=\"signature\""))
            .and(body_string_contains("payment_proofs/team_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_id": "payment_proofs/team_1",
                "secure_url": "https://res.cloudinary.com/demo/image/upload/payment_proofs/team_1.webp",
                "bytes": 2048,
                "width": 1200,
                "height": 600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let metadata = ObjectMetadata::from([("format".to_string(), "webp".to_string())]);
        let stored = storage(&server)
            .put(Bytes::from_static(b"RIFF"), "payment_proofs/team_1", &metadata)
            .await
            .unwrap();

        assert_eq!(stored.handle, "payment_proofs/team_1");
        assert_eq!(stored.stored_byte_size, 2048);
        assert!(stored.url.starts_with("https://res.cloudinary.com/"));
    }

    #[tokio::test]
    async fn test_upload_folder_prefix() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .and(body_string_contains("hackathon/payment_proofs/x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_id": "hackathon/payment_proofs/x",
                "secure_url": "https://res.cloudinary.com/demo/x.webp",
                "bytes": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let storage = CloudinaryStorage::new(
            CloudinaryConfig::new("demo", "key-123", "secret-xyz")
                .with_base_url(server.uri())
                .with_folder("hackathon/"),
        )
        .unwrap();

        let stored = storage
            .put(Bytes::from_static(b"RIFF"), "payment_proofs/x", &ObjectMetadata::new())
            .await
            .unwrap();

        assert_eq!(stored.handle, "hackathon/payment_proofs/x");
    }

    #[tokio::test]
    async fn test_upload_http_error_is_dependency_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Signature"))
            .mount(&server)
            .await;

        let result = storage(&server)
            .put(Bytes::from_static(b"RIFF"), "k", &ObjectMetadata::new())
            .await;

        match result {
            Err(DomainError::Dependency { provider, message }) => {
                assert_eq!(provider, "cloudinary");
                assert!(message.contains("401"));
            }
            other => panic!("expected dependency error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_destroy_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/destroy"))
            .and(body_string_contains("public_id=present"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/destroy"))
            .and(body_string_contains("public_id=missing"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "result": "not found" })),
            )
            .mount(&server)
            .await;

        let storage = storage(&server);
        assert!(storage.delete("present").await.unwrap());
        assert!(!storage.delete("missing").await.unwrap());
    }
}
