//! Error types for the gateway crate.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use gallery_core::CoreError;
use gallery_store::{RenameError, StoreError};

/// Errors that can occur during gateway request handling.
///
/// Each is rendered as `{"message": ..., "error": ...}`: a summary of what
/// failed plus the underlying cause.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// A required field is missing or the request body is malformed.
    #[error("{0}")]
    Validation(String),

    /// A single storage call failed.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// Some step of the fetch, store, delete sequence of a rename failed.
    #[error(transparent)]
    Rename(#[from] RenameError),
}

impl GatewayError {
    /// Wrap a storage failure with a summary of the attempted operation.
    #[must_use]
    pub fn storage(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| GatewayError::Storage { context, source }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Storage { .. } | GatewayError::Rename(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CoreError> for GatewayError {
    fn from(e: CoreError) -> Self {
        GatewayError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::Validation(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, detail) = match &self {
            GatewayError::Validation(msg) => (msg.clone(), "validation error".to_owned()),
            GatewayError::Storage { context, source } => ((*context).to_owned(), source.to_string()),
            GatewayError::Rename(e) => ("failed to rename file".to_owned(), e.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }

        (status, Json(json!({"message": message, "error": detail}))).into_response()
    }
}
