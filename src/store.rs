//! Client for one S3-compatible bucket.
//!
//! Wraps the AWS SDK client for authenticated list/put calls and a
//! `reqwest` client for unauthenticated fetches from the bucket's
//! public base URL.  One [`StoreClient`] is constructed per role
//! (source, target) from a [`StoreConfig`] descriptor.

use std::future::Future;
use std::pin::Pin;

use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

use crate::config::StoreConfig;
use crate::errors::SyncError;

/// Native S3 listing page size: one `ListObjectsV2` call returns at
/// most this many keys.
pub const PAGE_SIZE: usize = 1000;

/// One page of an object listing.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Object keys in listing order, directory markers included.
    pub keys: Vec<String>,
    /// Whether further pages remain after this one.
    pub truncated: bool,
}

impl ListingPage {
    /// The last key of this page, which is the cursor for the next one.
    pub fn last_key(&self) -> Option<&str> {
        self.keys.last().map(String::as_str)
    }
}

/// Async contract for one bucket: paginated listing, public fetch,
/// ACL'd upload.
///
/// [`StoreClient`] implements it against a real endpoint; tests
/// substitute an in-memory store.
pub trait ObjectStore: Send + Sync {
    /// List up to [`PAGE_SIZE`] keys ordered after `start_after`
    /// (empty string means from the beginning).
    fn list_page(
        &self,
        start_after: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ListingPage, SyncError>> + Send + '_>>;

    /// Fetch object content from the bucket's public base URL.
    fn fetch_public(
        &self,
        key: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, SyncError>> + Send + '_>>;

    /// Upload `data` under `key` with public-read access.
    fn put_object(
        &self,
        key: &str,
        data: Bytes,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>>;
}

/// Build the full public URL for `key` under `base`.
fn join_public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Client for one bucket endpoint.
pub struct StoreClient {
    /// AWS S3 SDK client for authenticated list/put calls.
    client: Client,
    /// HTTP client for unauthenticated public fetches.
    http: reqwest::Client,
    /// Bucket name.
    bucket: String,
    /// Public base URL for unauthenticated fetches; empty for the
    /// target role.
    public_base_url: String,
}

impl StoreClient {
    /// Create a client from a connection descriptor.
    ///
    /// The descriptor's static credentials are injected into the AWS
    /// config loader; endpoint URL and region come straight from the
    /// descriptor.
    pub async fn new(cfg: &StoreConfig) -> anyhow::Result<Self> {
        let creds = aws_sdk_s3::config::Credentials::new(
            &cfg.access_key,
            &cfg.secret_key,
            None, // session_token
            None, // expiry
            "s3migrate-config",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(cfg.region.clone()))
            .endpoint_url(&cfg.endpoint)
            .credentials_provider(creds)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(cfg.use_path_style)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            http: reqwest::Client::new(),
            bucket: cfg.bucket.clone(),
            public_base_url: cfg.public_base_url.clone(),
        })
    }

    /// Map an AWS SDK listing error into the fatal `List` category.
    fn list_error(&self, err: impl std::fmt::Display) -> SyncError {
        SyncError::List {
            bucket: self.bucket.clone(),
            source: anyhow::anyhow!("{err}"),
        }
    }
}

impl ObjectStore for StoreClient {
    fn list_page(
        &self,
        start_after: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ListingPage, SyncError>> + Send + '_>> {
        let start_after = start_after.to_string();
        Box::pin(async move {
            debug!(
                "list_objects_v2: bucket={} start_after='{}'",
                self.bucket, start_after
            );

            let mut req = self.client.list_objects_v2().bucket(&self.bucket);
            if !start_after.is_empty() {
                req = req.start_after(&start_after);
            }

            let resp = req.send().await.map_err(|e| self.list_error(e))?;

            let keys: Vec<String> = resp
                .contents()
                .iter()
                .filter_map(|obj| obj.key().map(str::to_string))
                .collect();

            Ok(ListingPage {
                keys,
                truncated: resp.is_truncated() == Some(true),
            })
        })
    }

    fn fetch_public(
        &self,
        key: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, SyncError>> + Send + '_>> {
        let url = join_public_url(&self.public_base_url, key);
        Box::pin(async move {
            debug!("GET {}", url);

            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| SyncError::Fetch {
                    url: url.clone(),
                    source: anyhow::anyhow!(e),
                })?;

            // Consumes the response, releasing the connection on every path.
            let body = resp.bytes().await.map_err(|e| SyncError::Fetch {
                url: url.clone(),
                source: anyhow::anyhow!(e),
            })?;

            Ok(body)
        })
    }

    fn put_object(
        &self,
        key: &str,
        data: Bytes,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>> {
        let key = key.to_string();
        Box::pin(async move {
            debug!(
                "put_object: bucket={} key={} ({} bytes)",
                self.bucket,
                key,
                data.len()
            );

            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(&key)
                .acl(ObjectCannedAcl::PublicRead)
                .body(aws_sdk_s3::primitives::ByteStream::from(data))
                .send()
                .await
                .map_err(|e| SyncError::Upload {
                    key: key.clone(),
                    source: anyhow::anyhow!("{e}"),
                })?;

            Ok(())
        })
    }
}

// -- Tests -------------------------------------------------------------------
