//! Connection settings for the Vercel Blob REST API.

/// Default endpoint of the Vercel Blob API.
pub const DEFAULT_API_URL: &str = "https://blob.vercel-storage.com";

/// Configuration for [`crate::VercelBlobStore`].
#[derive(Clone)]
#[non_exhaustive]
pub struct VercelConfig {
    /// Read-write token (`BLOB_READ_WRITE_TOKEN`).
    pub token: String,

    /// Base URL of the REST API.
    pub api_url: String,

    /// Base URL under which objects are publicly served. A pathname is
    /// appended to it to build the object's URL.
    pub public_url: String,
}

impl VercelConfig {
    /// Create a config pointing at the public Vercel endpoints.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_owned(),
            public_url: DEFAULT_API_URL.to_owned(),
        }
    }

    /// Override the REST API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the public object base URL.
    #[must_use]
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = public_url.into();
        self
    }
}

impl std::fmt::Debug for VercelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VercelConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("public_url", &self.public_url)
            .finish()
    }
}
