//! Integration test: `VercelBlobStore` wire format against a local fake of
//! the Vercel Blob REST API.
//!
//! The fake records the headers and query parameters it receives so the
//! tests can check authentication, pagination and error decoding without
//! network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use gallery_core::Pathname;
use gallery_store::{BlobStore, PutOptions, StoreError, VercelBlobStore, VercelConfig};

#[derive(Debug, Default)]
struct Recorded {
    auth: Vec<String>,
    api_versions: Vec<String>,
    put_queries: Vec<HashMap<String, String>>,
    put_content_types: Vec<String>,
    list_cursors: Vec<Option<String>>,
    deleted: Vec<Value>,
}

type Shared = Arc<Mutex<Recorded>>;

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

fn record_auth(state: &Shared, headers: &HeaderMap) {
    let mut rec = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    rec.auth.push(header_str(headers, "authorization"));
    rec.api_versions.push(header_str(headers, "x-api-version"));
}

async fn fake_put(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> impl IntoResponse {
    record_auth(&state, &headers);
    let pathname = query.get("pathname").cloned().unwrap_or_default();
    {
        let mut rec = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        rec.put_queries.push(query);
        rec.put_content_types.push(header_str(&headers, "x-content-type"));
    }
    if pathname == "reject.bin" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": "bad_request", "message": "pathname rejected"}})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "url": format!("https://abc.public.blob.vercel-storage.com/{pathname}"),
            "downloadUrl": format!("https://abc.public.blob.vercel-storage.com/{pathname}?download=1"),
            "pathname": pathname,
            "contentType": "image/png",
            "contentDisposition": "inline",
            "size": body.len(),
        })),
    )
}

async fn fake_list(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    record_auth(&state, &headers);
    let cursor = query.get("cursor").cloned();
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .list_cursors
        .push(cursor.clone());

    let page = match cursor.as_deref() {
        None => json!({
            "blobs": [{
                "url": "https://abc.public.blob.vercel-storage.com/one.png",
                "downloadUrl": "https://abc.public.blob.vercel-storage.com/one.png?download=1",
                "pathname": "one.png",
                "size": 1,
                "uploadedAt": "2024-05-01T12:00:00.000Z"
            }],
            "cursor": "page-2",
            "hasMore": true
        }),
        Some(_) => json!({
            "blobs": [{
                "url": "https://abc.public.blob.vercel-storage.com/dir/two.png",
                "downloadUrl": "https://abc.public.blob.vercel-storage.com/dir/two.png?download=1",
                "pathname": "dir/two.png",
                "size": 2,
                "uploadedAt": "2024-05-02T12:00:00.000Z"
            }],
            "hasMore": false
        }),
    };
    Json(page)
}

async fn fake_delete(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record_auth(&state, &headers);
    let forbidden = body["urls"][0] == "locked.png";
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .deleted
        .push(body);
    if forbidden {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": "forbidden", "message": "access denied"}})),
        );
    }
    (StatusCode::OK, Json(Value::Null))
}

async fn fake_object(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    if headers.contains_key(header::AUTHORIZATION) {
        record_auth(&state, &headers);
    }
    ([(header::CONTENT_TYPE, "image/webp")], Bytes::from_static(b"RIFF-webp"))
}

async fn spawn_fake() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/", put(fake_put).get(fake_list))
        .route("/delete", post(fake_delete))
        .route("/objects/present.webp", get(fake_object))
        .with_state(state.clone());

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(l) => l,
        Err(e) => panic!("failed to bind fake API: {e}"),
    };
    let addr = match listener.local_addr() {
        Ok(a) => a,
        Err(e) => panic!("no local addr: {e}"),
    };
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("fake API stopped: {e}");
        }
    });
    (format!("http://{addr}"), state)
}

fn client(base: &str) -> VercelBlobStore {
    let config = VercelConfig::new("vercel_blob_rw_test")
        .with_api_url(base)
        .with_public_url(format!("{base}/objects"));
    match VercelBlobStore::new(config) {
        Ok(c) => c,
        Err(e) => panic!("failed to build client: {e}"),
    }
}

fn path(s: &str) -> Pathname {
    match Pathname::new(s) {
        Ok(p) => p,
        Err(e) => panic!("{e}"),
    }
}

#[tokio::test]
async fn put_sends_pathname_token_and_content_type() {
    let (base, state) = spawn_fake().await;
    let store = client(&base);

    let object = match store
        .put(&path("gallery/cat.png"), Bytes::from_static(b"png!"), &PutOptions::with_content_type("image/png"))
        .await
    {
        Ok(o) => o,
        Err(e) => panic!("put failed: {e}"),
    };

    assert_eq!(object.pathname, "gallery/cat.png");
    assert_eq!(object.url, "https://abc.public.blob.vercel-storage.com/gallery/cat.png");
    assert_eq!(object.size, Some(4));

    let rec = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    assert_eq!(rec.auth, ["Bearer vercel_blob_rw_test"]);
    assert_eq!(rec.api_versions, ["7"]);
    assert_eq!(rec.put_queries[0].get("pathname").map(String::as_str), Some("gallery/cat.png"));
    assert_eq!(rec.put_content_types, ["image/png"]);
}

#[tokio::test]
async fn put_error_body_is_decoded() {
    let (base, _state) = spawn_fake().await;
    let store = client(&base);

    let err = store
        .put(&path("reject.bin"), Bytes::new(), &PutOptions::default())
        .await;
    match err {
        Err(StoreError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad_request: pathname rejected");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_follows_cursor_until_exhausted() {
    let (base, state) = spawn_fake().await;
    let store = client(&base);

    let objects = match store.list().await {
        Ok(o) => o,
        Err(e) => panic!("list failed: {e}"),
    };
    let names: Vec<_> = objects.iter().map(|o| o.pathname.as_str()).collect();
    assert_eq!(names, ["one.png", "dir/two.png"]);
    assert!(objects.iter().all(|o| o.uploaded_at.is_some()));

    let rec = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    assert_eq!(rec.list_cursors, [None, Some("page-2".to_owned())]);
}

#[tokio::test]
async fn delete_posts_pathname_in_urls_array() {
    let (base, state) = spawn_fake().await;
    let store = client(&base);

    if let Err(e) = store.delete(&path("gallery/cat.png")).await {
        panic!("delete failed: {e}");
    }
    let rec = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    assert_eq!(rec.deleted, [json!({"urls": ["gallery/cat.png"]})]);
}

#[tokio::test]
async fn delete_rejection_surfaces_as_api_error() {
    let (base, _state) = spawn_fake().await;
    let store = client(&base);

    let err = store.delete(&path("locked.png")).await;
    assert!(
        matches!(err, Err(StoreError::Api { status: 403, .. })),
        "expected 403 Api error, got {err:?}"
    );
}

#[tokio::test]
async fn fetch_reads_public_url_and_content_type() {
    let (base, state) = spawn_fake().await;
    let store = client(&base);

    let url = store.public_url(&path("present.webp"));
    assert_eq!(url, format!("{base}/objects/present.webp"));

    let fetched = match store.fetch(&url).await {
        Ok(f) => f,
        Err(e) => panic!("fetch failed: {e}"),
    };
    assert_eq!(fetched.body, Bytes::from_static(b"RIFF-webp"));
    assert_eq!(fetched.content_type.as_deref(), Some("image/webp"));

    // public downloads carry no credentials
    let rec = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    assert!(rec.auth.is_empty());
}

#[tokio::test]
async fn fetch_of_missing_object_is_fetch_error() {
    let (base, _state) = spawn_fake().await;
    let store = client(&base);

    let url = store.public_url(&path("absent.webp"));
    match store.fetch(&url).await {
        Err(StoreError::Fetch { status, url: failed }) => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected Fetch error, got {other:?}"),
    }
}
