//! Store client selected when connection settings are missing.

use king_gallery_core::StoredObject;

use crate::{ListOptions, StorageBackend, StoreError, UploadReceipt};

/// Backend that answers every operation with [`StoreError::NotConfigured`].
///
/// Public URLs resolve to the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStorage;

impl StorageBackend for UnconfiguredStorage {
    fn list(&self, _prefix: &str, _options: ListOptions) -> Result<Vec<StoredObject>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn upload(
        &self,
        _key: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<UploadReceipt, StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn remove(&self, _keys: &[String]) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn public_url(&self, _key: &str) -> String {
        String::new()
    }
}
