//! Remote object store client.
//!
//! Speaks plain HTTP to an S3-style gateway: `PUT /{bucket}/{object}` for
//! uploads and HMAC-signed, time-bounded GET URLs for retrieval.

use crate::store::StoreError;
use bytes::Bytes;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use hmac::{Hmac, Mac};
use http_body_util::Full;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Remote store configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Gateway endpoint, e.g. `http://minio:9000`
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key embedded in signed URLs
    pub access_key: String,
    /// Signing secret
    pub secret_key: SecretString,
    /// Lifetime of generated access URLs
    pub url_ttl: Duration,
    /// Per-request transport timeout
    pub request_timeout: Duration,
}

/// HTTP client against the remote object store
pub struct RemoteStore {
    config: RemoteConfig,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl RemoteStore {
    /// Build a client for the configured gateway
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { config, client }
    }

    /// Startup connectivity probe against the bucket.
    ///
    /// Any HTTP response proves reachability; only transport failures and
    /// timeouts count as a failed probe.
    ///
    /// # Errors
    ///
    /// Returns error if the gateway cannot be reached within the timeout
    pub async fn probe(&self) -> Result<(), StoreError> {
        let uri = self.object_uri("")?;
        let req = http::Request::builder()
            .method(http::Method::HEAD)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;

        let resp = tokio::time::timeout(self.config.request_timeout, self.client.request(req))
            .await
            .map_err(|_| StoreError::Transport {
                reason: "connectivity probe timed out".to_string(),
            })?
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;

        debug!(status = %resp.status(), bucket = %self.config.bucket, "object store probe");
        Ok(())
    }

    /// Upload a local artifact under the given object name.
    ///
    /// # Errors
    ///
    /// Returns error on read failure, transport failure, timeout, or a
    /// non-success gateway status
    pub async fn put(&self, artifact: &Path, object_name: &str) -> Result<(), StoreError> {
        let data = tokio::fs::read(artifact).await?;
        let uri = self.object_uri(object_name)?;
        let req = http::Request::builder()
            .method(http::Method::PUT)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/pdf")
            .body(Full::new(Bytes::from(data)))
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;

        let resp = tokio::time::timeout(self.config.request_timeout, self.client.request(req))
            .await
            .map_err(|_| StoreError::Transport {
                reason: format!("upload of {object_name} timed out"),
            })?
            .map_err(|e| StoreError::Transport {
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(StoreError::UploadRejected {
                status: resp.status().as_u16(),
            });
        }
        debug!(object = object_name, "uploaded artifact to remote store");
        Ok(())
    }

    /// Time-bounded signed GET URL for a stored object.
    ///
    /// Signature: `hex(hmac-sha256(secret, "GET\n/{bucket}/{object}\n{expires}"))`.
    #[must_use]
    pub fn presigned_url(&self, object_name: &str, now: DateTime<Utc>) -> String {
        let expires = (now + ChronoDuration::from_std(self.config.url_ttl).unwrap_or_default())
            .timestamp();
        let resource = format!("/{}/{}", self.config.bucket, object_name);
        let string_to_sign = format!("GET\n{resource}\n{expires}");

        // new_from_slice only fails on invalid key lengths; HMAC accepts any.
        let mut mac = HmacSha256::new_from_slice(self.config.secret_key.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(string_to_sign.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        format!(
            "{}{}?AccessKey={}&Expires={}&Signature={}",
            self.config.endpoint.trim_end_matches('/'),
            resource,
            self.config.access_key,
            expires,
            signature
        )
    }

    fn object_uri(&self, object_name: &str) -> Result<http::Uri, StoreError> {
        let raw = format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            object_name
        );
        raw.trim_end_matches('/')
            .parse::<http::Uri>()
            .map_err(|e| StoreError::Transport {
                reason: format!("invalid object URI: {e}"),
            })
    }
}
