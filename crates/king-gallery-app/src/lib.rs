#![warn(missing_docs)]
//! # king-gallery-app
//!
//! ## Purpose
//! Orchestrates the access gate, the object store and the gallery view state
//! for `king-gallery`.
//!
//! ## Responsibilities
//! - Load configuration from the environment without ever failing startup.
//! - Run the gallery operations (refresh, upload, delete) and reconcile their
//!   results into [`king_gallery_ui::GalleryState`].
//! - Gate uploads behind the password prompt.
//! - Map store failures to the banner texts shown to visitors.
//!
//! ## Data flow
//! Presentation intent -> [`GalleryController`] -> access gate check ->
//! [`king_gallery_store::StorageBackend`] call -> state update -> presentation
//! re-reads [`GalleryController::state`].
//!
//! ## Ownership and lifetimes
//! The controller owns its view state and gate; the store backend and clock
//! are shared handles injected at construction.
//!
//! ## Error model
//! Operation failures are caught at the controller boundary, logged, and
//! recorded in state. Methods still return them as [`AppError`] or
//! [`king_gallery_store::StoreError`] so callers such as the CLI can choose an
//! exit status.
//!
//! ## Security and privacy notes
//! - Password candidates and API keys are never logged.
//! - Store messages pass through [`redact_sensitive`] before logging.

mod config;
mod controller;

use std::sync::Arc;

use king_gallery_auth::{
    AccessGate, FileSessionFlag, MemorySessionFlag, PasswordPolicy, SessionFlag,
};
use king_gallery_core::CoreError;
use king_gallery_countdown::CountdownError;
use king_gallery_store::{FailureClass, StoreError, classify_store_error, connect};
use thiserror::Error;

pub use config::{
    AppConfig, ENV_BUCKET, ENV_SESSION_FILE, ENV_STORE_ENDPOINT, ENV_STORE_KEY, ENV_TIMEOUT_SECS,
    ENV_UPLOAD_PASSWORD,
};
pub use controller::{Clock, GalleryController, SystemClock, UploadReport};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("KING_GALLERY_VERSION");

/// Banner shown when the store connection settings are missing.
pub const NOT_CONFIGURED_BANNER: &str =
    "Supabase not configured. Please set up environment variables on Vercel.";

/// Banner shown when the store reports an error.
pub const STORE_FAILURE_BANNER: &str =
    "Unable to load images. Please check your Supabase connection.";

/// Banner shown when the store could not be reached.
pub const NETWORK_FAILURE_BANNER: &str =
    "Connection error. Please check your internet connection.";

/// Prompt message after a rejected password.
pub const INCORRECT_PASSWORD_MESSAGE: &str = "Incorrect password. Please try again.";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Maps a store failure to the banner shown to visitors.
pub fn failure_banner(error: &StoreError) -> &'static str {
    match classify_store_error(error) {
        FailureClass::NotConfigured => NOT_CONFIGURED_BANNER,
        FailureClass::Store => STORE_FAILURE_BANNER,
        FailureClass::Network => NETWORK_FAILURE_BANNER,
    }
}

/// Builds a controller wired to the configured store and session flag.
///
/// Without a session file every controller starts a fresh session.
pub fn build_controller(config: &AppConfig) -> GalleryController {
    let store = connect(&config.store);
    let session: Arc<dyn SessionFlag> = match &config.session_file {
        Some(path) => Arc::new(FileSessionFlag::new(path)),
        None => Arc::new(MemorySessionFlag::new()),
    };
    let gate = AccessGate::new(PasswordPolicy::new(config.upload_password.as_deref()), session);
    GalleryController::new(store, gate)
}

const SENSITIVE_KEYS: [&str; 5] = ["password", "apikey", "token", "authorization", "secret"];
const REDACTED: &str = "<redacted>";

/// Masks secret values in a message before it is logged.
///
/// Values of `key=value` and `key:value` pairs with a sensitive key are
/// replaced, as is the word after a bare `key:` or `Bearer`. Other text,
/// including sensitive words used in prose, is kept.
pub fn redact_sensitive(input: &str) -> String {
    let mut redact_next = false;
    input
        .split(' ')
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            if lower == "bearer" {
                redact_next = true;
                return word.to_string();
            }
            if redact_next && !word.is_empty() {
                redact_next = false;
                return REDACTED.to_string();
            }

            for key in SENSITIVE_KEYS {
                let Some(position) = lower.find(key) else {
                    continue;
                };
                let separator = position + key.len();
                if !matches!(lower.as_bytes().get(separator), Some(b'=' | b':')) {
                    continue;
                }
                if separator + 1 == word.len() {
                    redact_next = true;
                    return word.to_string();
                }
                return format!("{}{REDACTED}", &word[..=separator]);
            }
            word.to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// Core model rejected input.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    /// Countdown target could not be computed.
    #[error("countdown error: {0}")]
    Countdown(#[from] CountdownError),
    /// Password prompt was submitted blank.
    #[error("password must be non-empty")]
    EmptyPassword,
    /// Password did not match the allow-list.
    #[error("Incorrect password. Please try again.")]
    IncorrectPassword,
    /// Confirm was requested with no pending delete.
    #[error("no delete is pending confirmation")]
    NoPendingDelete,
    /// Local file could not be read.
    #[error("io error: {0}")]
    Io(String),
}
