#![warn(missing_docs)]
//! # king-gallery-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `king-gallery` workspace.
//!
//! ## Responsibilities
//! - Represent displayed gallery images and raw store listing entries.
//! - Represent files offered for upload and decide which ones are images.
//! - Generate collision-resistant store keys for new uploads.
//!
//! ## Data flow
//! The store client returns [`StoredObject`] entries, which the gallery
//! controller resolves into [`ImageRecord`] values. Upload intents arrive as
//! [`UploadFile`] values and receive a key from [`generate_store_key`].
//!
//! ## Ownership and lifetimes
//! Records and upload files own their strings and byte buffers so they can
//! move freely between the controller, the store client and the UI.
//!
//! ## Error model
//! Construction failures (blank file name) return [`CoreError`].
//!
//! ## Example
//! ```rust
//! use king_gallery_core::UploadFile;
//!
//! let file = UploadFile::new("king.jpg", "image/jpeg", vec![1, 2, 3]).unwrap();
//! assert!(file.is_image());
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bucket holding gallery images.
pub const DEFAULT_BUCKET: &str = "king-photos";

/// Maximum number of entries requested by one listing.
pub const LIST_PAGE_SIZE: usize = 100;

/// Marker object the store creates inside empty folders.
pub const EMPTY_FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

/// Length of the random part of a generated store key.
pub const KEY_SUFFIX_LEN: usize = 9;

/// One image shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Opaque store-assigned identifier.
    pub id: String,
    /// Public URL of the stored object.
    pub url: String,
    /// Store key of the object, used for deletion.
    pub name: String,
    /// Creation time as reported by the store or stamped at upload.
    pub created_at: Option<String>,
}

/// One raw entry returned by a store listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Store-assigned identifier. Folders have none.
    pub id: Option<String>,
    /// Store key.
    pub name: String,
    /// Creation time reported by the store.
    pub created_at: Option<String>,
}

impl StoredObject {
    /// Returns `true` when the entry is a stored file rather than a folder or
    /// the empty-folder marker.
    pub fn is_file(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
            && self.name != EMPTY_FOLDER_PLACEHOLDER
    }
}

/// File offered by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, including extension.
    pub name: String,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Constructs an upload file.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyFileName`] when `name` is blank.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::EmptyFileName);
        }

        Ok(Self {
            name,
            media_type: media_type.into(),
            bytes,
        })
    }

    /// Builds an upload file whose media type is guessed from the name.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyFileName`] when `name` is blank.
    pub fn with_guessed_type(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CoreError> {
        let name = name.into();
        let media_type = media_type_for_name(&name);
        Self::new(name, media_type, bytes)
    }

    /// Returns `true` when the declared media type is an image type.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Returns the text after the last `.` of `name`, or the whole name when it
/// has no dot.
pub fn file_extension(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Guesses a media type from a file name.
///
/// Unknown extensions map to `application/octet-stream`.
pub fn media_type_for_name(name: &str) -> &'static str {
    if !name.contains('.') {
        return "application/octet-stream";
    }

    match file_extension(name).to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// Generates a store key of the form `<unix-ms>-<random base36>.<extension>`.
///
/// # Errors
/// Returns [`CoreError::EmptyFileName`] when `file_name` is blank.
pub fn generate_store_key<R: Rng + ?Sized>(
    file_name: &str,
    now_ms: u64,
    rng: &mut R,
) -> Result<String, CoreError> {
    if file_name.trim().is_empty() {
        return Err(CoreError::EmptyFileName);
    }

    let suffix: String = (0..KEY_SUFFIX_LEN)
        .map(|_| {
            let digit = rng.random_range(0..36u32);
            char::from_digit(digit, 36).unwrap_or('0')
        })
        .collect();

    Ok(format!("{now_ms}-{suffix}.{}", file_extension(file_name)))
}

/// Drops records whose id already appeared earlier in the sequence.
pub fn dedupe_by_id(records: Vec<ImageRecord>) -> Vec<ImageRecord> {
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}

/// Error type for core model validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// File names must not be blank.
    #[error("file name is empty")]
    EmptyFileName,
}
