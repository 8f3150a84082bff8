//! Bearer token sources for the spreadsheet APIs.
//!
//! Deployments either mount a token file refreshed by an external agent, or
//! run on compute infrastructure exposing the metadata token endpoint.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use super::client::{map_status_error, map_transport_error};
use crate::domain::ports::RowStoreError;

/// Default metadata endpoint issuing tokens for the attached service account.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

const REFRESH_MARGIN_SECS: i64 = 60;

/// Supplier of OAuth bearer tokens.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a token valid for at least the next request.
    async fn access_token(&self) -> Result<String, RowStoreError>;
}

/// Token read from a file on every request.
///
/// Re-reading lets an external agent rotate the file in place.
pub struct StaticTokenFile {
    directory: Dir,
    file_name: String,
}

impl StaticTokenFile {
    /// Open the directory holding `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RowStoreError::Unauthorized`] when the path has no file
    /// name or its directory cannot be opened.
    pub fn open(path: &Path) -> Result<Self, RowStoreError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                RowStoreError::unauthorized(format!("token path {} has no file name", path.display()))
            })?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            RowStoreError::unauthorized(format!(
                "token directory {} unavailable: {error}",
                parent.display()
            ))
        })?;
        Ok(Self {
            directory,
            file_name,
        })
    }
}

#[async_trait]
impl TokenSource for StaticTokenFile {
    async fn access_token(&self) -> Result<String, RowStoreError> {
        let raw = Zeroizing::new(
            self.directory
                .read_to_string(&self.file_name)
                .map_err(|error| {
                    RowStoreError::unauthorized(format!("token file unreadable: {error}"))
                })?,
        );
        let token = raw.trim();
        if token.is_empty() {
            return Err(RowStoreError::unauthorized("token file is empty"));
        }
        Ok(token.to_owned())
    }
}

#[derive(Debug, Deserialize)]
struct MetadataTokenDto {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: Zeroizing<String>,
    refresh_after: DateTime<Utc>,
}

/// Token fetched from the compute metadata server and cached until shortly
/// before it expires.
pub struct MetadataTokenSource {
    client: Client,
    endpoint: Url,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataTokenSource {
    /// Build a source polling `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            clock,
            cached: Mutex::new(None),
        })
    }

    async fn fetch(&self) -> Result<MetadataTokenDto, RowStoreError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|error| RowStoreError::decode(format!("invalid metadata token: {error}")))
    }
}

#[async_trait]
impl TokenSource for MetadataTokenSource {
    async fn access_token(&self) -> Result<String, RowStoreError> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.utc();
        if let Some(token) = cached.as_ref().filter(|token| now < token.refresh_after) {
            return Ok(token.value.as_str().to_owned());
        }

        let fresh = self.fetch().await?;
        let lifetime = fresh.expires_in.saturating_sub(REFRESH_MARGIN_SECS).max(0);
        let token = CachedToken {
            value: Zeroizing::new(fresh.access_token),
            refresh_after: now + TimeDelta::seconds(lifetime),
        };
        let value = token.value.as_str().to_owned();
        *cached = Some(token);
        Ok(value)
    }
}
