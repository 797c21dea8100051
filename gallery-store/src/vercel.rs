//! Vercel Blob backend implementation.
//!
//! Speaks the Vercel Blob REST API directly over HTTPS: `PUT` to upload,
//! paginated `GET` to list, `POST /delete` to remove. Object bytes are
//! downloaded from their public URL without credentials.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;

use gallery_core::{Pathname, StoredObject};

use crate::backend::{object_url, BlobStore, FetchedObject, PutOptions};
use crate::{StoreError, VercelConfig};

/// Version of the REST API this client speaks.
pub const API_VERSION: &str = "7";

/// Page size requested when listing. The API caps it at 1000.
const LIST_PAGE_LIMIT: &str = "1000";

/// Vercel Blob backend.
///
/// Holds one pooled [`reqwest::Client`]; cloning is cheap and shares it.
#[derive(Debug, Clone)]
pub struct VercelBlobStore {
    client: Client,
    config: VercelConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    blobs: Vec<StoredObject>,
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl VercelBlobStore {
    /// Create a backend with a freshly built HTTP client.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] if the token is empty, or
    /// [`StoreError::Request`] if the HTTP client cannot be built.
    pub fn new(config: VercelConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(concat!("gallery-store/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, config)
    }

    /// Create a backend sharing an existing HTTP client.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] if the token is empty.
    pub fn with_client(client: Client, config: VercelConfig) -> Result<Self, StoreError> {
        if config.token.is_empty() {
            return Err(StoreError::Config(
                "a read-write token is required for the Vercel backend".to_owned(),
            ));
        }
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_url.trim_end_matches('/'))
    }

    /// Start an authenticated API request.
    fn api_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(path))
            .bearer_auth(&self.config.token)
            .header("x-api-version", API_VERSION)
    }

    /// Turn a non-success API response into [`StoreError::Api`].
    async fn check(resp: Response) -> Result<Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(ApiErrorBody { error: ApiErrorDetail { code, message } }) => {
                match (code, message) {
                    (Some(code), Some(message)) => format!("{code}: {message}"),
                    (None, Some(message)) => message,
                    (Some(code), None) => code,
                    (None, None) => text,
                }
            }
            Err(_) => text,
        };
        Err(StoreError::Api { status: status.as_u16(), message })
    }
}

#[async_trait]
impl BlobStore for VercelBlobStore {
    async fn put(
        &self,
        pathname: &Pathname,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<StoredObject, StoreError> {
        let size = body.len();
        let mut req = self
            .api_request(Method::PUT, "")
            .query(&[("pathname", pathname.as_str())])
            .header("x-add-random-suffix", "0");
        if let Some(content_type) = &options.content_type {
            req = req.header("x-content-type", content_type);
        }

        let resp = Self::check(req.body(body).send().await?).await?;
        let object: StoredObject = resp.json().await?;

        tracing::debug!(pathname = %pathname, size, url = %object.url, "blob stored");
        Ok(object)
    }

    async fn list(&self) -> Result<Vec<StoredObject>, StoreError> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut req = self
                .api_request(Method::GET, "")
                .query(&[("limit", LIST_PAGE_LIMIT)]);
            if let Some(c) = &cursor {
                req = req.query(&[("cursor", c.as_str())]);
            }

            let page: ListPage = Self::check(req.send().await?).await?.json().await?;
            objects.extend(page.blobs);

            match page.cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!(count = objects.len(), "blobs listed");
        Ok(objects)
    }

    async fn delete(&self, pathname: &Pathname) -> Result<(), StoreError> {
        let req = self
            .api_request(Method::POST, "delete")
            .json(&serde_json::json!({ "urls": [pathname.as_str()] }));
        Self::check(req.send().await?).await?;
        tracing::debug!(pathname = %pathname, "blob deleted");
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<FetchedObject, StoreError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Fetch { url: url.to_owned(), status: status.as_u16() });
        }
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp.bytes().await?;
        Ok(FetchedObject { body, content_type })
    }

    fn public_url(&self, pathname: &Pathname) -> String {
        object_url(&self.config.public_url, pathname)
    }
}
