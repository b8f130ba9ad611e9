//! In-memory object store
//!
//! Test double for the S3 store: a plain key-value map with switches to
//! inject read and write failures, used to exercise the pipeline's
//! degraded-cache behavior without a real bucket. Read failures can be
//! scoped to a key prefix so the cache side can fail while originals stay
//! readable.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{GetOutcome, ObjectStore, StorageError};

/// A stored object with its metadata
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: String,
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    read_fail_prefix: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object, bypassing failure injection
    pub fn insert(&self, key: &str, body: Bytes, content_type: &str) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                cache_control: String::new(),
            },
        );
    }

    /// Makes every `get` for keys under `prefix` report a storage failure
    ///
    /// An empty prefix fails all reads.
    pub fn fail_reads_under(&self, prefix: &str) {
        *self.read_fail_prefix.lock().unwrap() = Some(prefix.to_string());
    }

    pub fn clear_read_failures(&self) {
        *self.read_fail_prefix.lock().unwrap() = None;
    }

    /// Makes every subsequent `put` fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &str) -> GetOutcome {
        let failing = self
            .read_fail_prefix
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|prefix| key.starts_with(prefix.as_str()));
        if failing {
            return GetOutcome::Unavailable("injected read failure".to_string());
        }

        match self.objects.lock().unwrap().get(key) {
            Some(object) => GetOutcome::Found(object.body.clone()),
            None => GetOutcome::Missing,
        }
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError {
                key: key.to_string(),
                message: "injected write failure".to_string(),
            });
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                cache_control: cache_control.to_string(),
            },
        );

        Ok(())
    }
}
