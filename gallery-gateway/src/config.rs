//! Process configuration, read once at startup from flags and environment.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};

use gallery_store::{
    config::DEFAULT_API_URL, BlobStore, MemoryBlobStore, StoreError, VercelBlobStore,
    VercelConfig,
};

/// Default request body limit for uploads: the provider's server-upload cap.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 4_500_000;

/// Which blob-storage backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// Vercel Blob REST API.
    Vercel,
    /// Volatile in-process store, for local development.
    Memory,
}

/// Gateway configuration.
///
/// Values come from command-line flags, falling back to environment
/// variables (a `.env` file is loaded first), then to defaults.
#[derive(Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Listening host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listening port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory holding the frontend bundle
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Blob-storage backend
    #[arg(long, env = "BLOB_STORAGE", value_enum, default_value_t = StorageKind::Vercel)]
    pub storage: StorageKind,

    /// Vercel Blob read-write token
    #[arg(long, env = "BLOB_READ_WRITE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Vercel Blob REST API base URL
    #[arg(long, env = "VERCEL_BLOB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL objects are publicly served from
    #[arg(long, env = "BLOB_PUBLIC_URL", default_value = DEFAULT_API_URL)]
    pub public_url: String,

    /// Maximum accepted upload size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

/// Settings the router needs besides the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeOptions {
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("public"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// `host:port` string to bind.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn serve_options(&self) -> ServeOptions {
        ServeOptions {
            static_dir: self.static_dir.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }

    /// Construct the configured blob-storage backend.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] if the Vercel backend is selected
    /// without a token, or [`StoreError::Request`] if the HTTP client
    /// cannot be built.
    pub fn build_store(&self) -> Result<Arc<dyn BlobStore>, StoreError> {
        match self.storage {
            StorageKind::Memory => Ok(Arc::new(MemoryBlobStore::new())),
            StorageKind::Vercel => {
                let token = self.token.clone().unwrap_or_default();
                let config = VercelConfig::new(token)
                    .with_api_url(self.api_url.clone())
                    .with_public_url(self.public_url.clone());
                Ok(Arc::new(VercelBlobStore::new(config)?))
            }
        }
    }
}
