//! Gallery controller: list, upload and delete against the object store.

use std::sync::Arc;

use king_gallery_auth::AccessGate;
use king_gallery_core::{ImageRecord, StoredObject, UploadFile, generate_store_key};
use king_gallery_store::{
    FailureClass, ListOptions, StorageBackend, StoreError, classify_store_error,
};
use king_gallery_ui::{DeleteConfirmation, GalleryState};
use rand::SeedableRng;
use rand::rngs::StdRng;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, warn};

use crate::{
    AppError, INCORRECT_PASSWORD_MESSAGE, NOT_CONFIGURED_BANNER, failure_banner, redact_sensitive,
};

/// Time source for store keys and upload timestamps.
pub trait Clock: Send + Sync {
    /// Current Unix time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Current time as an RFC 3339 string.
    fn now_rfc3339(&self) -> String;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(0)
    }

    fn now_rfc3339(&self) -> String {
        let now = OffsetDateTime::now_utc();
        now.format(&Rfc3339)
            .unwrap_or_else(|_| now.unix_timestamp().to_string())
    }
}

/// Outcome of one upload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Records added, in upload order.
    pub uploaded: Vec<ImageRecord>,
    /// Files skipped because their media type is not an image type.
    pub skipped_non_image: usize,
    /// Image files the store rejected or could not receive.
    pub failed: usize,
    /// Set when the batch stopped early, with the reason shown to the user.
    pub aborted: Option<String>,
    /// `true` when nothing was sent because upload access is missing.
    pub prompt_required: bool,
}

/// Owns the gallery view state and drives store operations.
///
/// Every operation runs to completion before returning; store calls are
/// issued one at a time.
pub struct GalleryController {
    store: Arc<dyn StorageBackend>,
    gate: AccessGate,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    state: GalleryState,
}

impl GalleryController {
    /// Creates a controller using the system clock and an OS-seeded RNG.
    pub fn new(store: Arc<dyn StorageBackend>, gate: AccessGate) -> Self {
        Self::with_parts(store, gate, Arc::new(SystemClock), StdRng::from_os_rng())
    }

    /// Creates a controller with explicit clock and RNG.
    pub fn with_parts(
        store: Arc<dyn StorageBackend>,
        gate: AccessGate,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            gate,
            clock,
            rng,
            state: GalleryState::new(),
        }
    }

    /// Current view state.
    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Returns `true` when uploads are permitted in this session.
    pub fn has_upload_access(&self) -> bool {
        self.gate.has_upload_access()
    }

    /// Re-lists the bucket and replaces the displayed images.
    ///
    /// On failure the previous list is kept and a categorized banner is
    /// stored in `connection_error`. Returns the number of displayed images.
    pub fn refresh(&mut self) -> Result<usize, StoreError> {
        self.state.connection_error = None;

        let outcome = self
            .store
            .list("", ListOptions::default())
            .map(|entries| self.resolve_listing(entries));

        self.state.loading = false;
        match outcome {
            Ok(records) => {
                self.state.replace_images(records);
                let count = self.state.images().len();
                info!(stage = "gallery", action = "refresh", count, "images loaded");
                Ok(count)
            }
            Err(error) => {
                error!(
                    stage = "gallery",
                    action = "refresh",
                    error = %redact_sensitive(&error.to_string()),
                    "error loading images"
                );
                self.state.connection_error = Some(failure_banner(&error).to_string());
                Err(error)
            }
        }
    }

    fn resolve_listing(&self, entries: Vec<StoredObject>) -> Vec<ImageRecord> {
        entries
            .into_iter()
            .filter(StoredObject::is_file)
            .filter_map(|entry| {
                let id = entry.id?;
                Some(ImageRecord {
                    id,
                    url: self.store.public_url(&entry.name),
                    name: entry.name,
                    created_at: entry.created_at,
                })
            })
            .collect()
    }

    /// Opens the password prompt unless access is already granted.
    ///
    /// Returns `true` when the caller may go straight to file selection.
    pub fn request_upload_access(&mut self) -> bool {
        if self.gate.has_upload_access() {
            return true;
        }
        self.state.password_prompt_open = true;
        false
    }

    /// Checks a password candidate against the access gate.
    pub fn check_password(&mut self, candidate: &str) -> bool {
        self.gate.check_password(candidate)
    }

    /// Submits the password prompt.
    ///
    /// # Errors
    /// Returns [`AppError::EmptyPassword`] for a blank candidate without
    /// comparing it, and [`AppError::IncorrectPassword`] on mismatch (the
    /// prompt stays open with an error message).
    pub fn submit_password(&mut self, candidate: &str) -> Result<(), AppError> {
        if candidate.trim().is_empty() {
            return Err(AppError::EmptyPassword);
        }

        if !self.gate.check_password(candidate) {
            self.state.password_error = Some(INCORRECT_PASSWORD_MESSAGE.to_string());
            return Err(AppError::IncorrectPassword);
        }

        self.state.password_prompt_open = false;
        self.state.password_error = None;
        Ok(())
    }

    /// Closes the password prompt without checking anything.
    pub fn dismiss_password_prompt(&mut self) {
        self.state.password_prompt_open = false;
        self.state.password_error = None;
    }

    /// Uploads the image files of `files`, one at a time, in order.
    ///
    /// Without upload access nothing is sent and the password prompt opens.
    /// Non-image files are skipped. A failed file is logged and skipped; a
    /// missing store configuration stops the batch.
    pub fn upload(&mut self, files: &[UploadFile]) -> UploadReport {
        let mut report = UploadReport::default();
        if !self.gate.has_upload_access() {
            info!(stage = "gallery", action = "upload", "upload access required");
            self.state.password_prompt_open = true;
            report.prompt_required = true;
            return report;
        }

        self.state.uploading = true;
        for file in files {
            if !file.is_image() {
                report.skipped_non_image += 1;
                continue;
            }

            let key = match generate_store_key(&file.name, self.clock.now_ms(), &mut self.rng) {
                Ok(key) => key,
                Err(error) => {
                    warn!(stage = "gallery", action = "upload", %error, "skipping file");
                    report.failed += 1;
                    continue;
                }
            };

            match self.store.upload(&key, &file.bytes, &file.media_type) {
                Ok(receipt) => {
                    let record = ImageRecord {
                        id: receipt.id,
                        url: self.store.public_url(&receipt.key),
                        name: receipt.key,
                        created_at: Some(self.clock.now_rfc3339()),
                    };
                    info!(stage = "gallery", action = "upload", key = %record.name, "image uploaded");
                    self.state.prepend_image(record.clone());
                    report.uploaded.push(record);
                }
                Err(error) => {
                    error!(
                        stage = "gallery",
                        action = "upload",
                        file = %file.name,
                        error = %redact_sensitive(&error.to_string()),
                        "error uploading file"
                    );
                    if classify_store_error(&error) == FailureClass::NotConfigured {
                        report.aborted = Some(NOT_CONFIGURED_BANNER.to_string());
                        break;
                    }
                    report.failed += 1;
                }
            }
        }
        self.state.uploading = false;

        report
    }

    /// Opens the delete confirmation for one record. No store call is made.
    pub fn request_delete(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.state.delete_confirmation = Some(DeleteConfirmation {
            target_id: id.into(),
            target_name: name.into(),
        });
    }

    /// Closes the delete confirmation without a store call.
    pub fn cancel_delete(&mut self) {
        self.state.delete_confirmation = None;
    }

    /// Removes the pending record from the store, then from local state.
    ///
    /// The confirmation is cleared whatever the outcome. Returns `true` when
    /// a local record was dropped.
    ///
    /// # Errors
    /// Returns [`AppError::NoPendingDelete`] when nothing awaits confirmation
    /// and [`AppError::Store`] when the store refused; local state is then
    /// unchanged.
    pub fn confirm_delete(&mut self) -> Result<bool, AppError> {
        let pending = self
            .state
            .delete_confirmation
            .take()
            .ok_or(AppError::NoPendingDelete)?;

        if !self.gate.has_upload_access() {
            // Deletion is not gated; only uploads are.
            warn!(
                stage = "gallery",
                action = "delete",
                key = %pending.target_name,
                "delete issued without upload access"
            );
        }

        if let Err(error) = self
            .store
            .remove(std::slice::from_ref(&pending.target_name))
        {
            error!(
                stage = "gallery",
                action = "delete",
                key = %pending.target_name,
                error = %redact_sensitive(&error.to_string()),
                "error deleting file"
            );
            return Err(AppError::Store(error));
        }

        let removed = self.state.remove_image(&pending.target_id);
        info!(stage = "gallery", action = "delete", key = %pending.target_name, removed, "image deleted");
        Ok(removed)
    }

    /// Opens the lightbox on a displayed record. Returns `false` for unknown ids.
    pub fn select_image(&mut self, id: &str) -> bool {
        let Some(record) = self.state.find(id).cloned() else {
            return false;
        };
        self.state.selected_image = Some(record);
        true
    }

    /// Closes the lightbox.
    pub fn clear_selection(&mut self) {
        self.state.selected_image = None;
    }
}

impl std::fmt::Debug for GalleryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryController")
            .field("gate", &self.gate)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
