#![warn(missing_docs)]
//! # king-gallery-ui
//!
//! ## Purpose
//! Defines the view state of the gallery and its presentation projections.
//!
//! ## Responsibilities
//! - Hold the displayed images, transient flags, selection and modal state.
//! - Keep the "one record per id" invariant on every list mutation.
//! - Project state into the texts the presentation layer renders.
//!
//! ## Data flow
//! The gallery controller mutates [`GalleryState`] after each completed store
//! call; renderers read it through [`GalleryState::body`] and
//! [`UploadAffordance::project`].
//!
//! ## Ownership and lifetimes
//! `GalleryState` owns every record and string so renderers can clone
//! snapshots without borrowing from the controller.
//!
//! ## Error model
//! No recoverable errors: invalid transitions (for example confirming with
//! no pending delete) are represented by `Option` values.

use king_gallery_core::{ImageRecord, dedupe_by_id};

/// Pending delete awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    /// Id of the record to drop from local state.
    pub target_id: String,
    /// Store key to remove.
    pub target_name: String,
}

/// What the gallery body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryBody {
    /// Initial load has not finished.
    Loading,
    /// Images to render; an error banner may still show below them.
    Grid(usize),
    /// Last refresh failed and nothing is listed.
    Error(String),
    /// Store is reachable and empty.
    Empty,
}

/// Gallery view state owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    images: Vec<ImageRecord>,
    /// `true` until the first refresh completes.
    pub loading: bool,
    /// `true` while an upload batch runs.
    pub uploading: bool,
    /// Categorized message from the last failed refresh.
    pub connection_error: Option<String>,
    /// Image opened in the lightbox.
    pub selected_image: Option<ImageRecord>,
    /// Whether the password prompt is showing.
    pub password_prompt_open: bool,
    /// Message shown in the password prompt after a rejected attempt.
    pub password_error: Option<String>,
    /// Pending delete confirmation.
    pub delete_confirmation: Option<DeleteConfirmation>,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryState {
    /// Creates the initial state: loading, no images, no modals.
    pub fn new() -> Self {
        Self {
            images: Vec::new(),
            loading: true,
            uploading: false,
            connection_error: None,
            selected_image: None,
            password_prompt_open: false,
            password_error: None,
            delete_confirmation: None,
        }
    }

    /// Displayed images, newest local additions first.
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    /// Replaces the list wholesale. Later duplicates of an id are dropped.
    pub fn replace_images(&mut self, images: Vec<ImageRecord>) {
        self.images = dedupe_by_id(images);
    }

    /// Puts `record` at the front, displacing any record with the same id.
    pub fn prepend_image(&mut self, record: ImageRecord) {
        self.images.retain(|existing| existing.id != record.id);
        self.images.insert(0, record);
    }

    /// Drops the record with `id`, clearing the selection if it pointed at it.
    ///
    /// Returns `true` when a record was removed.
    pub fn remove_image(&mut self, id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|record| record.id != id);

        if self
            .selected_image
            .as_ref()
            .is_some_and(|selected| selected.id == id)
        {
            self.selected_image = None;
        }

        self.images.len() != before
    }

    /// Finds a displayed record by id.
    pub fn find(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|record| record.id == id)
    }

    /// Body projection for renderers.
    pub fn body(&self) -> GalleryBody {
        if self.loading {
            return GalleryBody::Loading;
        }
        if !self.images.is_empty() {
            return GalleryBody::Grid(self.images.len());
        }
        match &self.connection_error {
            Some(message) => GalleryBody::Error(message.clone()),
            None => GalleryBody::Empty,
        }
    }
}

/// Texts of the upload drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAffordance {
    /// Primary label.
    pub label: &'static str,
    /// Secondary hint.
    pub hint: &'static str,
    /// Whether the file picker may open.
    pub enabled: bool,
}

impl UploadAffordance {
    /// Projects the upload zone from the state and the access gate.
    pub fn project(state: &GalleryState, has_upload_access: bool) -> Self {
        let label = if state.uploading {
            "Uploading..."
        } else if has_upload_access {
            "Click to upload"
        } else {
            "Click to unlock upload"
        };
        let hint = if has_upload_access {
            "PNG, JPG or GIF (MAX. 10MB each)"
        } else {
            "Password required to upload"
        };

        Self {
            label,
            hint,
            enabled: has_upload_access && !state.uploading,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for list invariants and projections.

    use super::*;

    fn record(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            url: format!("https://cdn.example.test/{id}.jpg"),
            name: format!("{id}.jpg"),
            created_at: None,
        }
    }

    #[test]
    fn prepend_never_duplicates_an_id() {
        let mut state = GalleryState::new();
        state.replace_images(vec![record("a"), record("b")]);
        state.prepend_image(record("b"));

        let ids: Vec<&str> = state.images().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn removing_selected_image_clears_selection() {
        let mut state = GalleryState::new();
        state.replace_images(vec![record("a")]);
        state.selected_image = Some(record("a"));

        assert!(state.remove_image("a"));
        assert!(state.selected_image.is_none());
        assert!(!state.remove_image("a"));
    }

    #[test]
    fn body_prefers_grid_over_stale_error() {
        let mut state = GalleryState::new();
        assert_eq!(state.body(), GalleryBody::Loading);

        state.loading = false;
        state.connection_error = Some("down".to_string());
        assert_eq!(state.body(), GalleryBody::Error("down".to_string()));

        state.replace_images(vec![record("a")]);
        assert_eq!(state.body(), GalleryBody::Grid(1));
    }

    #[test]
    fn affordance_reflects_gate_and_upload_progress() {
        let mut state = GalleryState::new();
        assert_eq!(
            UploadAffordance::project(&state, false).label,
            "Click to unlock upload"
        );

        state.uploading = true;
        let busy = UploadAffordance::project(&state, true);
        assert_eq!(busy.label, "Uploading...");
        assert!(!busy.enabled);
    }
}
