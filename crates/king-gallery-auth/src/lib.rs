#![warn(missing_docs)]
//! # king-gallery-auth
//!
//! ## Purpose
//! Implements the upload access gate for `king-gallery`.
//!
//! ## Responsibilities
//! - Compare password candidates against the accepted allow-list.
//! - Persist the granted flag for the lifetime of one session.
//! - Seed the gate from the persisted flag at startup.
//!
//! ## Data flow
//! Password prompt collects a candidate -> [`AccessGate::check_password`]
//! compares it through [`PasswordPolicy`] -> on success the [`SessionFlag`]
//! is written so later uploads in the same session skip the prompt.
//!
//! ## Error model
//! Only session persistence can fail ([`AccessError`]). Persistence failures
//! are logged and never block the in-memory grant.
//!
//! ## Security and privacy notes
//! The gate is a deterrent, not an authentication boundary: the accepted
//! values ship with the client. Candidates are never logged.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use king_gallery_auth::{AccessGate, MemorySessionFlag, PasswordPolicy};
//!
//! let mut gate = AccessGate::new(PasswordPolicy::new(None), Arc::new(MemorySessionFlag::new()));
//! assert!(!gate.has_upload_access());
//! assert!(gate.check_password("king2024"));
//! assert!(gate.has_upload_access());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Passwords accepted in addition to the configured one.
pub const BUILTIN_PASSWORDS: [&str; 3] = ["king2024", "King2025", "king2025"];

/// Allow-list of accepted upload passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    accepted: Vec<String>,
}

impl PasswordPolicy {
    /// Builds the allow-list from an optional configured secret followed by
    /// the built-in values. Blank configured values are ignored.
    pub fn new(configured: Option<&str>) -> Self {
        let accepted = configured
            .filter(|value| !value.is_empty())
            .into_iter()
            .chain(BUILTIN_PASSWORDS)
            .map(str::to_string)
            .collect();
        Self { accepted }
    }

    /// Returns `true` when `candidate` exactly matches an accepted value.
    pub fn accepts(&self, candidate: &str) -> bool {
        self.accepted.iter().any(|accepted| accepted == candidate)
    }

    /// Number of accepted values.
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Always `false`: the built-in values are never removed.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Session-scoped storage for the "has upload access" flag.
pub trait SessionFlag: Send + Sync {
    /// Reads the persisted flag. Missing state reads as `false`.
    fn load(&self) -> Result<bool, AccessError>;

    /// Persists the flag for the rest of the session.
    fn store(&self, granted: bool) -> Result<(), AccessError>;
}

/// Flag held in process memory; the session ends with the process.
#[derive(Debug, Default)]
pub struct MemorySessionFlag {
    granted: AtomicBool,
}

impl MemorySessionFlag {
    /// Creates an ungranted in-memory flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flag seeded with `granted`, as if restored from an earlier
    /// point in the same session.
    pub fn with_granted(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }
}

impl SessionFlag for MemorySessionFlag {
    fn load(&self) -> Result<bool, AccessError> {
        Ok(self.granted.load(Ordering::SeqCst))
    }

    fn store(&self, granted: bool) -> Result<(), AccessError> {
        self.granted.store(granted, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFlagRecord {
    upload_access: bool,
}

/// Flag persisted as a small JSON file.
///
/// One file is one session: deleting it starts a fresh session. Used by the
/// CLI so a grant survives across invocations within a shell session.
#[derive(Debug, Clone)]
pub struct FileSessionFlag {
    path: PathBuf,
}

impl FileSessionFlag {
    /// Creates a file-backed flag at `path`. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionFlag for FileSessionFlag {
    fn load(&self) -> Result<bool, AccessError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(error) => return Err(AccessError::Persistence(error.to_string())),
        };

        let record: SessionFlagRecord = serde_json::from_str(&raw)
            .map_err(|error| AccessError::Corrupt(error.to_string()))?;
        Ok(record.upload_access)
    }

    fn store(&self, granted: bool) -> Result<(), AccessError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|error| AccessError::Persistence(error.to_string()))?;
        }

        let raw = serde_json::to_string(&SessionFlagRecord {
            upload_access: granted,
        })
        .map_err(|error| AccessError::Corrupt(error.to_string()))?;

        std::fs::write(&self.path, raw).map_err(|error| AccessError::Persistence(error.to_string()))
    }
}

/// Upload access gate seeded from the session flag.
#[derive(Clone)]
pub struct AccessGate {
    policy: PasswordPolicy,
    session: Arc<dyn SessionFlag>,
    granted: bool,
}

impl AccessGate {
    /// Creates a gate and seeds it from the persisted session flag.
    ///
    /// An unreadable flag is logged and treated as not granted.
    pub fn new(policy: PasswordPolicy, session: Arc<dyn SessionFlag>) -> Self {
        let granted = session.load().unwrap_or_else(|error| {
            warn!(stage = "access", action = "seed", %error, "session flag unreadable");
            false
        });

        Self {
            policy,
            session,
            granted,
        }
    }

    /// Returns `true` when uploads are currently permitted.
    pub fn has_upload_access(&self) -> bool {
        self.granted
    }

    /// Checks a password candidate.
    ///
    /// On a match the gate opens and the session flag is persisted. A failed
    /// persist is logged; the grant still holds for this gate. A mismatch
    /// changes nothing.
    pub fn check_password(&mut self, candidate: &str) -> bool {
        if !self.policy.accepts(candidate) {
            info!(stage = "access", action = "check", "password rejected");
            return false;
        }

        self.granted = true;
        if let Err(error) = self.session.store(true) {
            warn!(stage = "access", action = "persist", %error, "session flag not saved");
        }
        info!(stage = "access", action = "check", "upload access granted");
        true
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("accepted", &self.policy.len())
            .field("granted", &self.granted)
            .finish()
    }
}

/// Errors produced while persisting the session flag.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Backing storage could not be read or written.
    #[error("session flag persistence failure: {0}")]
    Persistence(String),
    /// Stored flag could not be decoded.
    #[error("session flag is corrupt: {0}")]
    Corrupt(String),
}
