//! S3-compatible object store

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use rusty_s3::{Bucket, Credentials, S3Action, UrlStyle};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::ObjectStore;
use crate::config::S3Config;
use crate::error::{CampaignError, Result};

const TWO_MINUTES: Duration = Duration::from_secs(2 * 60);

const PUBLIC_READ: &str = "public-read";

/// Uploads through presigned PUT requests and hands out public object URLs
pub struct S3ObjectStore {
    bucket: Bucket,
    credentials: Credentials,
    http_client: reqwest::Client,
    /// `https://<bucket>.<endpoint host>`, or `<endpoint>/<bucket>` with path style
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(config: &S3Config) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| CampaignError::Config(format!("Invalid S3 endpoint: {}", e)))?;
        let host = endpoint
            .host_str()
            .ok_or_else(|| CampaignError::Config("S3 endpoint has no host".to_string()))?
            .to_string();

        let (url_style, public_base_url) = if config.force_path_style {
            (
                UrlStyle::Path,
                format!("{}/{}", endpoint.as_str().trim_end_matches('/'), config.bucket),
            )
        } else {
            (UrlStyle::VirtualHost, format!("https://{}.{}", config.bucket, host))
        };

        let bucket = Bucket::new(
            endpoint,
            url_style,
            config.bucket.clone(),
            config.region.clone(),
        )
        .map_err(|e| CampaignError::Config(format!("Invalid S3 bucket: {}", e)))?;

        Ok(Self {
            bucket,
            credentials: Credentials::new(config.access_key.clone(), config.secret_key.clone()),
            http_client: reqwest::Client::new(),
            public_base_url,
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key.trim_start_matches('/'))
    }

    /// Signed PUT URL; the content type and ACL headers are part of the signature
    fn presigned_put(&self, key: &str, content_type: &str) -> Url {
        let mut action = self.bucket.put_object(Some(&self.credentials), key);
        action.headers_mut().insert("content-type", content_type);
        action.headers_mut().insert("x-amz-acl", PUBLIC_READ);
        action.sign(TWO_MINUTES)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String> {
        let signed = self.presigned_put(key, content_type);

        let size = bytes.len();
        let response = self
            .http_client
            .put(signed.as_str())
            .header(CONTENT_TYPE, content_type)
            .header("x-amz-acl", PUBLIC_READ)
            .body(bytes)
            .send()
            .await
            .map_err(|e| CampaignError::Storage(format!("S3 upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(key, %status, "S3 upload failed: {}", error_text);
            return Err(CampaignError::Storage(format!(
                "S3 upload failed: {} - {}",
                status, error_text
            )));
        }

        debug!(key, size, "Stored object in S3");

        Ok(self.public_url(key))
    }
}
