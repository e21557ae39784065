//! REST client for a Supabase Storage bucket.

use std::sync::Arc;

use king_gallery_core::StoredObject;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ListOptions, StorageBackend, StoreError,
    UploadReceipt,
};

const STORAGE_PATH: [&str; 3] = ["storage", "v1", "object"];
const CACHE_CONTROL: &str = "max-age=3600";

#[derive(Debug, Serialize)]
struct ListBody<'a> {
    prefix: &'a str,
    limit: usize,
    offset: usize,
    #[serde(rename = "sortBy")]
    sort_by: SortBy,
}

#[derive(Debug, Serialize)]
struct SortBy {
    column: &'static str,
    order: &'static str,
}

#[derive(Debug, Serialize)]
struct RemoveBody<'a> {
    prefixes: &'a [String],
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(rename = "Id", alias = "id")]
    id: Option<String>,
    #[serde(rename = "Key", alias = "key")]
    key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Live client for one bucket of a storage REST API.
#[derive(Clone)]
pub struct LiveStorageClient {
    endpoint: Url,
    api_key: String,
    bucket: String,
    transport: Arc<dyn HttpTransport>,
}

impl LiveStorageClient {
    /// Creates a client for `bucket` at `endpoint`.
    ///
    /// `endpoint` should come from [`crate::validate_endpoint`].
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            endpoint,
            api_key: api_key.into(),
            bucket: bucket.into(),
            transport,
        }
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(STORAGE_PATH).extend(segments);
        }
        url
    }

    fn request(&self, method: HttpMethod, url: Url, content_type: &str, body: Vec<u8>) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![
                ("apikey".to_string(), self.api_key.clone()),
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.api_key),
                ),
                ("Content-Type".to_string(), content_type.to_string()),
            ],
            body,
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, StoreError> {
        debug!(stage = "store", action = "send", url = %request.url, "store request");
        let response = self.transport.execute(request)?;
        if response.is_success() {
            return Ok(response);
        }

        let parsed: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .unwrap_or_else(|| String::from_utf8_lossy(&response.body).trim().to_string());

        Err(StoreError::Backend {
            status: response.status,
            message,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|error| StoreError::Decode(error.to_string()))
}

impl StorageBackend for LiveStorageClient {
    fn list(&self, prefix: &str, options: ListOptions) -> Result<Vec<StoredObject>, StoreError> {
        let body = to_json(&ListBody {
            prefix,
            limit: options.limit,
            offset: options.offset,
            sort_by: SortBy {
                column: "name",
                order: "asc",
            },
        })?;
        let url = self.object_url(["list", self.bucket.as_str()]);
        let response = self.send(self.request(HttpMethod::Post, url, "application/json", body))?;

        serde_json::from_slice(&response.body).map_err(|error| StoreError::Decode(error.to_string()))
    }

    fn upload(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<UploadReceipt, StoreError> {
        let url = self.object_url(std::iter::once(self.bucket.as_str()).chain(key.split('/')));
        let mut request = self.request(HttpMethod::Post, url, content_type, bytes.to_vec());
        request
            .headers
            .push(("cache-control".to_string(), CACHE_CONTROL.to_string()));
        request
            .headers
            .push(("x-upsert".to_string(), "false".to_string()));

        let response = self.send(request)?;
        let parsed: UploadBody = serde_json::from_slice(&response.body)
            .map_err(|error| StoreError::Decode(error.to_string()))?;

        // Older storage versions answer with the key only.
        let id = parsed
            .id
            .filter(|id| !id.trim().is_empty())
            .or(parsed.key)
            .ok_or_else(|| StoreError::Decode("upload response has no id".to_string()))?;

        Ok(UploadReceipt {
            id,
            key: key.to_string(),
        })
    }

    fn remove(&self, keys: &[String]) -> Result<(), StoreError> {
        let body = to_json(&RemoveBody { prefixes: keys })?;
        let url = self.object_url([self.bucket.as_str()]);
        self.send(self.request(HttpMethod::Delete, url, "application/json", body))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.object_url(
            ["public", self.bucket.as_str()]
                .into_iter()
                .chain(key.split('/')),
        )
        .to_string()
    }
}

impl std::fmt::Debug for LiveStorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveStorageClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for URL construction.

    use super::*;

    struct Unreachable;

    impl HttpTransport for Unreachable {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, StoreError> {
            Err(StoreError::Transport("offline".to_string()))
        }
    }

    fn client(endpoint: &str) -> LiveStorageClient {
        LiveStorageClient::new(
            Url::parse(endpoint).expect("fixture url"),
            "anon",
            "king-photos",
            Arc::new(Unreachable),
        )
    }

    #[test]
    fn public_url_follows_storage_layout() {
        assert_eq!(
            client("https://p.supabase.co").public_url("1-abc.jpg"),
            "https://p.supabase.co/storage/v1/object/public/king-photos/1-abc.jpg"
        );
        assert_eq!(
            client("https://p.supabase.co/").public_url("dir/a b.png"),
            "https://p.supabase.co/storage/v1/object/public/king-photos/dir/a%20b.png"
        );
    }

    #[test]
    fn transport_failure_surfaces_unchanged() {
        assert_eq!(
            client("https://p.supabase.co").remove(&["a.jpg".to_string()]),
            Err(StoreError::Transport("offline".to_string()))
        );
    }
}
