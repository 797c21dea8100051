//! Error types for the store crate.

use std::fmt;

use gallery_core::Pathname;

/// Errors that can occur while talking to a blob-storage backend.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Transport failure or an undecodable response body.
    #[error("blob API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The blob API answered with a non-success status.
    #[error("blob API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Downloading an object from its public URL failed.
    #[error("fetching {url} returned HTTP {status}")]
    Fetch { url: String, status: u16 },

    /// The backend is not configured well enough to serve requests.
    #[error("blob store misconfigured: {0}")]
    Config(String),

    /// The backend refused the operation.
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// The stage of a rename at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStep {
    /// Downloading the original bytes.
    Fetch,
    /// Uploading the bytes under the new pathname.
    Store,
    /// Deleting the original object.
    Delete,
}

impl fmt::Display for RenameStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenameStep::Fetch => "fetch",
            RenameStep::Store => "store",
            RenameStep::Delete => "delete",
        })
    }
}

/// A rename failed part-way through.
///
/// When `step` is [`RenameStep::Delete`] the copy at `target` already
/// exists alongside the original.
#[derive(Debug, thiserror::Error)]
#[error("rename of {source_path} to {target} failed at {step} step: {error}")]
pub struct RenameError {
    pub step: RenameStep,
    pub source_path: Pathname,
    pub target: Pathname,
    #[source]
    pub error: StoreError,
}
