//! Blob-storage backend abstraction trait.
//!
//! Allows swapping between the Vercel Blob REST API and the in-memory
//! store without changing the request handlers.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use gallery_core::{Pathname, StoredObject};

use crate::StoreError;

/// Per-upload options. Objects are always stored with public read access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// MIME type recorded for the object. The provider infers one when unset.
    pub content_type: Option<String>,
}

impl PutOptions {
    /// Options carrying an explicit content type.
    #[must_use]
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self { content_type: Some(content_type.into()) }
    }
}

/// Bytes downloaded from an object's public URL.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub body: Bytes,
    /// `Content-Type` reported by the server, if any.
    pub content_type: Option<String>,
}

/// Blob-storage service client.
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// every request task. None of the methods retry.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `pathname` with public access.
    ///
    /// # Errors
    /// Returns [`StoreError::Api`] if the provider rejects the upload, or
    /// [`StoreError::Request`] on transport failure.
    async fn put(
        &self,
        pathname: &Pathname,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<StoredObject, StoreError>;

    /// Enumerate every object in the store, in provider order.
    ///
    /// # Errors
    /// Returns [`StoreError::Api`] or [`StoreError::Request`] if any page fails.
    async fn list(&self) -> Result<Vec<StoredObject>, StoreError>;

    /// Delete the object at `pathname`. Whether a missing object is an
    /// error is up to the provider.
    ///
    /// # Errors
    /// Returns [`StoreError::Api`] or [`StoreError::Request`] on failure.
    async fn delete(&self, pathname: &Pathname) -> Result<(), StoreError>;

    /// Download the bytes behind a public object URL.
    ///
    /// # Errors
    /// Returns [`StoreError::Fetch`] if the response status is not a success.
    async fn fetch(&self, url: &str) -> Result<FetchedObject, StoreError>;

    /// Public URL at which the object stored under `pathname` is served.
    ///
    /// Each `/`-separated segment of the pathname is percent-encoded, so
    /// keys containing `#`, `?` or spaces still address the object.
    fn public_url(&self, pathname: &Pathname) -> String;
}

/// Join `base` and `pathname` into an object URL, percent-encoding each
/// path segment.
pub(crate) fn object_url(base: &str, pathname: &Pathname) -> String {
    let base = base.trim_end_matches('/');
    let Ok(mut url) = Url::parse(base) else {
        return format!("{base}/{pathname}");
    };
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(pathname.as_str().split('/'));
        }
        Err(()) => return format!("{base}/{pathname}"),
    }
    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Pathname {
        match Pathname::new(s) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn object_url_encodes_reserved_characters_per_segment() {
        assert_eq!(
            object_url("https://store.example", &path("a/cat #1?.png")),
            "https://store.example/a/cat%20%231%3F.png"
        );
    }

    #[test]
    fn object_url_keeps_base_path_and_slashes() {
        assert_eq!(
            object_url("https://store.example/bucket/", &path("x/y/z.txt")),
            "https://store.example/bucket/x/y/z.txt"
        );
    }

    #[test]
    fn object_url_falls_back_for_unparseable_base() {
        assert_eq!(object_url("not a url", &path("a.png")), "not a url/a.png");
    }
}
