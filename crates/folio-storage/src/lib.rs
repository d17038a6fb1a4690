//! Folio Storage Library
//!
//! Storage sink for the upload pipeline: a `Storage` trait plus the local
//! filesystem implementation. All artifacts live flat in one configured root
//! directory so delete-by-name stays trivial; public URLs are the configured
//! base path plus the file name.
//!
//! # File name format
//!
//! Names are synthesized from a [`naming::NamingKey`], never from the declared
//! upload file name: `{tag}_{id}[_{slot}]_{timestamp}_{random}.{ext}`, with
//! thumbnails sharing the stem plus a `_thumb` suffix. Names must not contain
//! `..` or path separators; both the naming module and the backend enforce it.

pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use naming::NamingKey;
pub use traits::{Storage, StorageError, StorageResult};
