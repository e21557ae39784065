//! Shared fakes for gallery controller integration tests.

use std::sync::{Arc, Mutex};

use king_gallery_app::{Clock, GalleryController};
use king_gallery_auth::{AccessGate, MemorySessionFlag, PasswordPolicy};
use king_gallery_core::{StoredObject, UploadFile};
use king_gallery_store::{ListOptions, StorageBackend, StoreError, UploadReceipt};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// In-memory store with scriptable failures.
#[derive(Debug, Default)]
pub struct FakeStore {
    /// Objects returned by `list`.
    pub objects: Mutex<Vec<StoredObject>>,
    /// Error returned by the next `list`, if any.
    pub list_error: Mutex<Option<StoreError>>,
    /// Keys whose upload fails with the paired error.
    pub upload_failures: Mutex<Vec<(String, StoreError)>>,
    /// Error returned by every `remove`, if any.
    pub remove_error: Mutex<Option<StoreError>>,
    /// Keys passed to `upload`, in call order.
    pub uploaded_keys: Mutex<Vec<String>>,
    /// Key lists passed to `remove`, in call order.
    pub removed: Mutex<Vec<Vec<String>>>,
}

#[allow(dead_code)]
impl FakeStore {
    /// Creates a store listing `count` files.
    pub fn with_files(count: usize) -> Arc<Self> {
        let store = Self::default();
        {
            let mut objects = store.objects.lock().expect("objects lock should work");
            for index in 0..count {
                objects.push(StoredObject {
                    id: Some(format!("id-{index}")),
                    name: format!("{index}-seed.jpg"),
                    created_at: Some("2025-10-01T00:00:00Z".to_string()),
                });
            }
        }
        Arc::new(store)
    }

    /// Makes uploads whose generated key ends in `.extension` fail.
    pub fn fail_upload_with_extension(&self, extension: &str, error: StoreError) {
        self.upload_failures
            .lock()
            .expect("failure lock should work")
            .push((format!(".{extension}"), error));
    }

    /// Number of upload calls received.
    pub fn upload_calls(&self) -> usize {
        self.uploaded_keys.lock().expect("keys lock should work").len()
    }
}

impl StorageBackend for FakeStore {
    fn list(&self, _prefix: &str, options: ListOptions) -> Result<Vec<StoredObject>, StoreError> {
        if let Some(error) = self.list_error.lock().expect("error lock should work").take() {
            return Err(error);
        }
        let objects = self.objects.lock().expect("objects lock should work");
        Ok(objects
            .iter()
            .skip(options.offset)
            .take(options.limit)
            .cloned()
            .collect())
    }

    fn upload(
        &self,
        key: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<UploadReceipt, StoreError> {
        self.uploaded_keys
            .lock()
            .expect("keys lock should work")
            .push(key.to_string());

        let failures = self.upload_failures.lock().expect("failure lock should work");
        if let Some((_, error)) = failures.iter().find(|(suffix, _)| key.ends_with(suffix)) {
            return Err(error.clone());
        }

        Ok(UploadReceipt {
            id: format!("uploaded-{key}"),
            key: key.to_string(),
        })
    }

    fn remove(&self, keys: &[String]) -> Result<(), StoreError> {
        self.removed
            .lock()
            .expect("removed lock should work")
            .push(keys.to_vec());
        match self.remove_error.lock().expect("error lock should work").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.example.test/king-photos/{key}")
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug)]
pub struct FixedClock;

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        1_761_436_800_000
    }

    fn now_rfc3339(&self) -> String {
        "2025-10-26T00:00:00Z".to_string()
    }
}

/// Builds a controller over `store` with the gate opened or locked.
#[allow(dead_code)]
pub fn controller(store: Arc<FakeStore>, unlocked: bool) -> GalleryController {
    let gate = AccessGate::new(
        PasswordPolicy::new(None),
        Arc::new(MemorySessionFlag::with_granted(unlocked)),
    );
    GalleryController::with_parts(store, gate, Arc::new(FixedClock), StdRng::seed_from_u64(42))
}

/// Builds an upload file with an explicit media type.
#[allow(dead_code)]
pub fn file(name: &str, media_type: &str) -> UploadFile {
    UploadFile::new(name, media_type, vec![0xff, 0xd8]).expect("fixture file should be valid")
}
