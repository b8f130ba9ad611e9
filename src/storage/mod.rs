//! Object storage abstraction
//!
//! This module defines the `ObjectStore` trait the pipeline reads originals
//! from and writes derived artifacts to. Read results are modeled as an
//! explicit [`GetOutcome`] variant instead of exception flow, so the
//! "treat a storage error as a cache miss" policy is a visible branch at
//! the call site.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

pub use memory::MemoryStore;
pub use s3::S3Store;

/// Outcome of a single object read
#[derive(Debug, Clone)]
pub enum GetOutcome {
    /// The object exists; full body attached
    Found(Bytes),
    /// The key does not exist
    Missing,
    /// The storage layer failed; true absence unknown
    Unavailable(String),
}

/// Error writing an object
#[derive(Debug, Clone)]
pub struct StorageError {
    pub key: String,
    pub message: String,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to write {}: {}", self.key, self.message)
    }
}

impl std::error::Error for StorageError {}

/// Key-value blob store addressed by string keys
///
/// The sole persistence layer: originals are read by source key, derived
/// artifacts are read and written by cache key. No listing or transactional
/// requirements beyond single get/put.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object by key
    ///
    /// Infallible by design: errors are folded into the outcome variant and
    /// classified by the caller.
    async fn get(&self, key: &str) -> GetOutcome;

    /// Write an object with its content type and cache-control hint
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), StorageError>;
}
