//! Blob-storage access for the gallery gateway.
//!
//! Provides the [`BlobStore`] trait, a Vercel Blob REST implementation,
//! an in-memory implementation, and the multi-step rename workflow.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod rename;
pub mod vercel;

pub use backend::{BlobStore, FetchedObject, PutOptions};
pub use config::VercelConfig;
pub use error::{RenameError, RenameStep, StoreError};
pub use memory::{MemoryBlobStore, Operation};
pub use rename::rename_object;
pub use vercel::VercelBlobStore;
