//! Tests that duplicate record ids collapse to their first occurrence.

use king_gallery_core::{ImageRecord, dedupe_by_id};

fn record(id: &str, name: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        url: format!("https://cdn.example.test/{name}"),
        name: name.to_string(),
        created_at: None,
    }
}

#[test]
fn image_dedupe_tests_keep_first_occurrence_in_order() {
    let records = vec![
        record("a", "first.jpg"),
        record("b", "second.jpg"),
        record("a", "shadow.jpg"),
        record("c", "third.jpg"),
    ];

    let deduped = dedupe_by_id(records);
    let names: Vec<&str> = deduped.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["first.jpg", "second.jpg", "third.jpg"]);
}
