//! Integration tests for a gallery without store connection settings.

use std::sync::Arc;

use king_gallery_app::{
    GalleryController, NETWORK_FAILURE_BANNER, NOT_CONFIGURED_BANNER,
};
use king_gallery_auth::{AccessGate, MemorySessionFlag, PasswordPolicy};
use king_gallery_core::UploadFile;
use king_gallery_store::{StoreConfig, connect};

fn unconfigured_controller(unlocked: bool) -> GalleryController {
    let store = connect(&StoreConfig::new(None, None));
    let gate = AccessGate::new(
        PasswordPolicy::new(None),
        Arc::new(MemorySessionFlag::with_granted(unlocked)),
    );
    GalleryController::new(store, gate)
}

#[test]
fn unconfigured_store_tests_refresh_reports_configuration_not_network() {
    let mut controller = unconfigured_controller(false);

    assert!(controller.refresh().is_err());
    assert!(controller.state().images().is_empty());
    let banner = controller.state().connection_error.as_deref();
    assert_eq!(banner, Some(NOT_CONFIGURED_BANNER));
    assert_ne!(banner, Some(NETWORK_FAILURE_BANNER));
}

#[test]
fn unconfigured_store_tests_upload_batch_stops_at_first_file() {
    let mut controller = unconfigured_controller(true);
    let files = vec![
        UploadFile::new("a.png", "image/png", vec![1]).expect("valid file"),
        UploadFile::new("b.png", "image/png", vec![2]).expect("valid file"),
    ];

    let report = controller.upload(&files);

    assert!(report.uploaded.is_empty());
    assert_eq!(report.failed, 0);
    assert_eq!(report.aborted.as_deref(), Some(NOT_CONFIGURED_BANNER));
    assert!(!controller.state().uploading);
}
