//! Integration tests for the live storage client against a scripted transport.

use std::sync::{Arc, Mutex};

use king_gallery_store::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ListOptions, LiveStorageClient,
    StorageBackend, StoreError, validate_endpoint,
};
use serde_json::{Value, json};

#[derive(Debug, Default)]
struct ScriptedTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<Vec<HttpResponse>>,
}

impl ScriptedTransport {
    fn answering(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(vec![HttpResponse {
                status,
                body: body.to_string().into_bytes(),
            }]),
        })
    }

    fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .expect("request lock should work")
            .last()
            .cloned()
            .expect("a request should have been sent")
    }
}

impl HttpTransport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, StoreError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(request);
        self.responses
            .lock()
            .expect("response lock should work")
            .pop()
            .ok_or_else(|| StoreError::Transport("no scripted response".to_string()))
    }
}

fn client(transport: Arc<ScriptedTransport>) -> LiveStorageClient {
    LiveStorageClient::new(
        validate_endpoint("https://project.supabase.co").expect("endpoint should validate"),
        "anon-key",
        "king-photos",
        transport,
    )
}

#[test]
fn live_client_tests_list_posts_paging_and_parses_entries() {
    let transport = ScriptedTransport::answering(
        200,
        json!([
            {"id": "id-1", "name": "1-a.jpg", "created_at": "2025-10-01T10:00:00Z", "metadata": {}},
            {"id": null, "name": "folder", "created_at": null}
        ]),
    );

    let entries = client(transport.clone())
        .list("", ListOptions { limit: 100, offset: 0 })
        .expect("list should succeed");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id.as_deref(), Some("id-1"));
    assert!(entries[0].is_file());
    assert!(!entries[1].is_file());

    let request = transport.last_request();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.url.as_str(),
        "https://project.supabase.co/storage/v1/object/list/king-photos"
    );
    assert_eq!(request.header("apikey"), Some("anon-key"));
    assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
    let body: Value = serde_json::from_slice(&request.body).expect("body should be json");
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["prefix"], "");
}

#[test]
fn live_client_tests_upload_sends_bytes_and_reads_id() {
    let transport = ScriptedTransport::answering(
        200,
        json!({"Id": "obj-9", "Key": "king-photos/1-abc.png"}),
    );

    let receipt = client(transport.clone())
        .upload("1-abc.png", &[1, 2, 3], "image/png")
        .expect("upload should succeed");

    assert_eq!(receipt.id, "obj-9");
    assert_eq!(receipt.key, "1-abc.png");

    let request = transport.last_request();
    assert_eq!(
        request.url.as_str(),
        "https://project.supabase.co/storage/v1/object/king-photos/1-abc.png"
    );
    assert_eq!(request.header("content-type"), Some("image/png"));
    assert_eq!(request.header("x-upsert"), Some("false"));
    assert_eq!(request.body, vec![1, 2, 3]);
}

#[test]
fn live_client_tests_remove_sends_prefixes() {
    let transport = ScriptedTransport::answering(200, json!([]));

    client(transport.clone())
        .remove(&["1-abc.png".to_string()])
        .expect("remove should succeed");

    let request = transport.last_request();
    assert_eq!(request.method, HttpMethod::Delete);
    let body: Value = serde_json::from_slice(&request.body).expect("body should be json");
    assert_eq!(body, json!({"prefixes": ["1-abc.png"]}));
}

#[test]
fn live_client_tests_error_body_message_is_surfaced() {
    let transport = ScriptedTransport::answering(
        403,
        json!({"statusCode": "403", "error": "Unauthorized", "message": "new row violates row-level security policy"}),
    );

    let result = client(transport).upload("x.png", &[0], "image/png");

    assert_eq!(
        result,
        Err(StoreError::Backend {
            status: 403,
            message: "new row violates row-level security policy".to_string(),
        })
    );
}

#[test]
fn live_client_tests_malformed_listing_is_a_decode_error() {
    let transport = ScriptedTransport::answering(200, json!({"unexpected": true}));

    let result = client(transport).list("", ListOptions::default());

    assert!(matches!(result, Err(StoreError::Decode(_))));
}
