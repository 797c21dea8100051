//! HTTP gateway for the blob gallery.
//!
//! Proxies upload, listing, deletion and rename of files to a blob-storage
//! backend and serves the static gallery frontend for every other path.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod routes;
