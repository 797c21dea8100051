//! Core types for the blob gallery gateway.
//!
//! Defines the stored-object metadata forwarded from the blob-storage
//! provider and the pathname key type used to address objects.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod object;
pub mod pathname;

pub use error::CoreError;
pub use object::StoredObject;
pub use pathname::Pathname;
