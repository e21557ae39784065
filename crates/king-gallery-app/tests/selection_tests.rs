//! Integration tests for lightbox selection.

mod common;

#[test]
fn selection_tests_select_known_image_and_clear() {
    let store = common::FakeStore::with_files(2);
    let mut controller = common::controller(store, false);
    controller.refresh().expect("refresh should succeed");

    assert!(!controller.select_image("missing"));
    assert!(controller.state().selected_image.is_none());

    assert!(controller.select_image("id-1"));
    let selected = controller
        .state()
        .selected_image
        .as_ref()
        .map(|record| record.name.as_str());
    assert_eq!(selected, Some("1-seed.jpg"));

    controller.clear_selection();
    assert!(controller.state().selected_image.is_none());
}
