use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata describing one object held by the blob-storage service.
///
/// The storage provider owns this entity; the gateway only forwards it.
/// Fields the provider sends that are not modelled here are kept in
/// [`StoredObject::extra`] and serialized back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct StoredObject {
    /// Unique key of the object within the store.
    pub pathname: String,
    /// Public absolute URL of the object's bytes.
    pub url: String,
    /// URL that forces a download instead of inline display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Size in bytes, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Upload time, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
    /// MIME type the object is served with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// `Content-Disposition` header the object is served with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,
    /// Provider-defined fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredObject {
    /// Create metadata with only the required fields set.
    #[must_use]
    pub fn new(pathname: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            url: url.into(),
            download_url: None,
            size: None,
            uploaded_at: None,
            content_type: None,
            content_disposition: None,
            extra: Map::new(),
        }
    }
}
