#![warn(missing_docs)]
//! # king-gallery-store
//!
//! ## Purpose
//! Client side of the hosted object store that holds gallery images.
//!
//! ## Responsibilities
//! - Define the [`StorageBackend`] capability (`list`, `upload`, `remove`,
//!   `public_url`) consumed by the gallery controller.
//! - Provide the live REST client ([`LiveStorageClient`]) and the client used
//!   when connection settings are missing ([`UnconfiguredStorage`]).
//! - Select between the two at construction time ([`connect`]).
//! - Classify store failures into user-facing categories.
//!
//! ## Data flow
//! Controller -> [`StorageBackend`] -> [`HttpTransport`] -> storage REST API.
//! Listing entries come back as [`king_gallery_core::StoredObject`].
//!
//! ## Ownership and lifetimes
//! Backends are shared as `Arc<dyn StorageBackend>` and are `Send + Sync`;
//! requests and responses own their buffers.
//!
//! ## Error model
//! Every operation returns [`StoreError`]. Missing configuration is a
//! distinct variant so callers can tell it apart from transient failures.
//!
//! ## Security and privacy notes
//! The public API key is sent as a header and never logged.

mod live;
mod transport;
mod unconfigured;

use std::sync::Arc;
use std::time::Duration;

use king_gallery_core::{DEFAULT_BUCKET, LIST_PAGE_SIZE, StoredObject};
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

pub use live::LiveStorageClient;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use unconfigured::UnconfiguredStorage;

/// Message carried by every operation of an unconfigured store.
pub const NOT_CONFIGURED_MESSAGE: &str = "Supabase not configured - missing environment variables";

/// Default timeout for one store request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Paging options for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of entries to return.
    pub limit: usize,
    /// Number of entries to skip.
    pub offset: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: LIST_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Store-assigned object id.
    pub id: String,
    /// Store key the object was saved under.
    pub key: String,
}

/// Object store capability used by the gallery controller.
pub trait StorageBackend: Send + Sync {
    /// Lists objects under `prefix`.
    fn list(&self, prefix: &str, options: ListOptions) -> Result<Vec<StoredObject>, StoreError>;

    /// Stores `bytes` under `key`.
    fn upload(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<UploadReceipt, StoreError>;

    /// Removes the objects stored under `keys`.
    fn remove(&self, keys: &[String]) -> Result<(), StoreError>;

    /// Returns the public URL for `key`. Pure; performs no request.
    fn public_url(&self, key: &str) -> String;
}

/// Connection settings for the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project endpoint, e.g. `https://xyz.supabase.co`.
    pub endpoint: Option<String>,
    /// Public (anon) API key.
    pub anon_key: Option<String>,
    /// Bucket holding gallery images.
    pub bucket: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration for the default bucket.
    pub fn new(endpoint: Option<String>, anon_key: Option<String>) -> Self {
        Self {
            endpoint,
            anon_key,
            bucket: DEFAULT_BUCKET.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Returns `true` when both connection values are present and non-blank.
    pub fn is_configured(&self) -> bool {
        present(&self.endpoint) && present(&self.anon_key)
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|value| !value.trim().is_empty())
}

/// Validates a store endpoint: it must parse and use `http` or `https`.
///
/// # Errors
/// Returns [`StoreError::InvalidEndpoint`] otherwise.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, StoreError> {
    let parsed = Url::parse(endpoint.trim())
        .map_err(|error| StoreError::InvalidEndpoint(format!("invalid store url: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(StoreError::InvalidEndpoint(
            "store endpoint must be an http(s) base url".to_string(),
        ));
    }

    Ok(parsed)
}

/// Builds the store backend for `config`.
///
/// Never fails: missing or unusable connection settings select
/// [`UnconfiguredStorage`], which reports misconfiguration on every call.
pub fn connect(config: &StoreConfig) -> Arc<dyn StorageBackend> {
    let (Some(endpoint), Some(anon_key)) = (config.endpoint.as_deref(), config.anon_key.as_deref())
    else {
        error!(
            stage = "store",
            action = "connect",
            endpoint_found = present(&config.endpoint),
            key_found = present(&config.anon_key),
            "store connection settings missing; using unconfigured client"
        );
        return Arc::new(UnconfiguredStorage);
    };

    if !config.is_configured() {
        error!(stage = "store", action = "connect", "store connection settings blank");
        return Arc::new(UnconfiguredStorage);
    }

    let endpoint = match validate_endpoint(endpoint) {
        Ok(endpoint) => endpoint,
        Err(error) => {
            error!(stage = "store", action = "connect", %error, "using unconfigured client");
            return Arc::new(UnconfiguredStorage);
        }
    };

    let transport = match ReqwestTransport::new(config.timeout) {
        Ok(transport) => transport,
        Err(error) => {
            warn!(stage = "store", action = "connect", %error, "http client unavailable");
            return Arc::new(UnconfiguredStorage);
        }
    };

    info!(
        stage = "store",
        action = "connect",
        bucket = %config.bucket,
        "store client initialized"
    );
    Arc::new(LiveStorageClient::new(
        endpoint,
        anon_key.trim(),
        config.bucket.clone(),
        Arc::new(transport),
    ))
}

/// User-facing category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Connection settings are missing.
    NotConfigured,
    /// The store answered with an error.
    Store,
    /// The request never got a usable answer.
    Network,
}

/// Maps a store error to its user-facing category.
pub fn classify_store_error(error: &StoreError) -> FailureClass {
    match error {
        StoreError::NotConfigured | StoreError::InvalidEndpoint(_) => FailureClass::NotConfigured,
        StoreError::Backend { .. } | StoreError::Decode(_) => FailureClass::Store,
        StoreError::Transport(_) => FailureClass::Network,
    }
}

/// Errors produced by store backends.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Connection settings are missing.
    #[error("Supabase not configured - missing environment variables")]
    NotConfigured,
    /// Endpoint could not be used.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Store rejected the request.
    #[error("store error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Message reported by the store.
        message: String,
    },
    /// Request could not be sent or the response could not be read.
    #[error("store transport failure: {0}")]
    Transport(String),
    /// Response body did not match the expected shape.
    #[error("store response decode failure: {0}")]
    Decode(String),
}
