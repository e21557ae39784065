//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use king_gallery_core::DEFAULT_BUCKET;
use king_gallery_store::{DEFAULT_REQUEST_TIMEOUT, StoreConfig};
use tracing::{info, warn};

/// Store project endpoint.
pub const ENV_STORE_ENDPOINT: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// Store public API key.
pub const ENV_STORE_KEY: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
/// Optional extra upload password.
pub const ENV_UPLOAD_PASSWORD: &str = "NEXT_PUBLIC_UPLOAD_PASSWORD";
/// Bucket override.
pub const ENV_BUCKET: &str = "KING_GALLERY_BUCKET";
/// Session flag file override.
pub const ENV_SESSION_FILE: &str = "KING_GALLERY_SESSION_FILE";
/// Request timeout override in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "KING_GALLERY_TIMEOUT_SECS";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Store connection settings.
    pub store: StoreConfig,
    /// Extra accepted upload password.
    pub upload_password: Option<String>,
    /// File holding the session access flag. `None` keeps the flag in
    /// process memory, so the grant ends with the process.
    pub session_file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`. Missing or invalid values are
    /// logged and defaulted; nothing here fails.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let endpoint = var(ENV_STORE_ENDPOINT);
        let anon_key = var(ENV_STORE_KEY);
        info!(
            stage = "config",
            action = "load",
            endpoint = if endpoint.is_some() { "found" } else { "missing" },
            key = if anon_key.is_some() { "found" } else { "missing" },
            "store settings"
        );
        if endpoint.is_none() || anon_key.is_none() {
            warn!(
                stage = "config",
                action = "load",
                "set {ENV_STORE_ENDPOINT} and {ENV_STORE_KEY} to enable the gallery store"
            );
        }

        let bucket = var(ENV_BUCKET).unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        let timeout = var(ENV_TIMEOUT_SECS)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    warn!(stage = "config", action = "load", value = %raw, "invalid {ENV_TIMEOUT_SECS}, using default");
                    None
                }
                Ok(secs) => Some(Duration::from_secs(secs)),
            })
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let session_file = var(ENV_SESSION_FILE).map(PathBuf::from);
        if session_file.is_none() {
            info!(
                stage = "config",
                action = "load",
                "no {ENV_SESSION_FILE}; upload access lasts for this process only"
            );
        }

        Self {
            store: StoreConfig {
                endpoint,
                anon_key,
                bucket,
                timeout,
            },
            upload_password: lookup(ENV_UPLOAD_PASSWORD),
            session_file,
        }
    }
}
