//! Axum route handlers for the gallery API.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use gallery_core::{Pathname, StoredObject};
use gallery_store::{rename_object, BlobStore, PutOptions};

use crate::{config::ServeOptions, error::GatewayError};

/// Request header carrying the name to store an upload under.
pub const FILENAME_HEADER: &str = "x-vercel-filename";

// ── Shared state ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
}

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DeleteBody {
    #[serde(default)]
    pub pathname: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameBody {
    #[serde(default)]
    pub pathname: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router over the given blob store.
///
/// Paths not matched by an API route are served from
/// `options.static_dir`.
pub fn create_router(store: Arc<dyn BlobStore>, options: &ServeOptions) -> Router {
    Router::new()
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::max(options.max_upload_bytes)),
        )
        .route("/api/files", get(list_files))
        .route("/api/delete", delete(delete_file))
        .route("/api/rename", put(rename_file))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(&options.static_dir))
        .with_state(AppState { store })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `POST /api/upload` — store the request body under the name given in
/// the [`FILENAME_HEADER`] header.
///
/// # Errors
/// Returns [`GatewayError::Validation`] if the header is missing or empty,
/// or [`GatewayError::Storage`] if the upload fails.
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StoredObject>, GatewayError> {
    let pathname = filename_header(&headers)?;
    let options = PutOptions {
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };

    let size = body.len();
    let object = state
        .store
        .put(&pathname, body, &options)
        .await
        .map_err(GatewayError::storage("failed to upload file"))?;

    tracing::info!(pathname = %pathname, size, url = %object.url, "file uploaded");
    Ok(Json(object))
}

/// `GET /api/files` — every stored object, in provider order.
///
/// # Errors
/// Returns [`GatewayError::Storage`] if listing fails.
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredObject>>, GatewayError> {
    let objects = state
        .store
        .list()
        .await
        .map_err(GatewayError::storage("failed to list files"))?;
    Ok(Json(objects))
}

/// `DELETE /api/delete` — remove the object named by `pathname`.
///
/// # Errors
/// Returns [`GatewayError::Validation`] if `pathname` is missing, or
/// [`GatewayError::Storage`] if the delete fails.
pub async fn delete_file(
    State(state): State<AppState>,
    body: Result<Json<DeleteBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let Json(body) = body?;
    let pathname = Pathname::new(
        non_empty(body.pathname).ok_or_else(|| validation("pathname is required"))?,
    )?;

    state
        .store
        .delete(&pathname)
        .await
        .map_err(GatewayError::storage("failed to delete file"))?;

    tracing::info!(pathname = %pathname, "file deleted");
    Ok(Json(MessageResponse { message: "file deleted".to_owned() }))
}

/// `PUT /api/rename` — move `pathname` to a sibling named `newName`.
///
/// # Errors
/// Returns [`GatewayError::Validation`] if either field is missing or
/// `newName` is already the current name, or [`GatewayError::Rename`] if any step of the rename fails. A failure
/// after the copy was stored leaves both objects in place.
pub async fn rename_file(
    State(state): State<AppState>,
    body: Result<Json<RenameBody>, JsonRejection>,
) -> Result<Json<StoredObject>, GatewayError> {
    let Json(body) = body?;
    let (Some(pathname), Some(new_name)) = (non_empty(body.pathname), non_empty(body.new_name))
    else {
        return Err(validation("pathname and newName are required"));
    };

    let source = Pathname::new(pathname)?;
    let target = source.with_leaf(&new_name)?;
    if target == source {
        return Err(validation("newName must differ from the current name"));
    }
    let object = rename_object(state.store.as_ref(), &source, &target).await?;
    Ok(Json(object))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validation(message: &str) -> GatewayError {
    GatewayError::Validation(message.to_owned())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn filename_header(headers: &HeaderMap) -> Result<Pathname, GatewayError> {
    let name = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Pathname::new(name)
        .map_err(|_| validation("file name is required in the x-vercel-filename header"))
}
