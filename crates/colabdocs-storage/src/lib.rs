//! Colabdocs Storage Library
//!
//! This crate provides the file-storage abstraction used by the collaborator
//! import: the `StorageClient` trait plus a remote HTTP backend and a local
//! filesystem backend.
//!
//! # Layout
//!
//! Files live in flat, named folders: `{folder_name}/{stored_file_name}`.
//! Folder and file names must be a single path segment (no `/`, `\` or `..`).
//! Name validation is centralized in the `keys` module so all backends agree.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-http")]
pub mod http;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use colabdocs_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-http")]
pub use http::{HttpStorage, HttpStorageOptions};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{StorageClient, StorageError, StorageResult, StoredFile};
