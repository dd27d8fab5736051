use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("transport failure while uploading `{key}`: {message}")]
    Transport { key: String, message: String },
    #[error("upload of `{key}` was not authorized (credentials rejected)")]
    Auth { key: String },
    #[error("permission denied writing `{key}` to bucket `{bucket}`")]
    PermissionDenied { bucket: String, key: String },
    #[error("bucket `{bucket}` was not found")]
    BucketNotFound { bucket: String },
    #[error("storage backend rejected `{key}` with status {status}: {body}")]
    Rejected { key: String, status: u16, body: String },
}

/// A byte blob persisted under a flat object key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Write access to a flat-namespace blob store.
///
/// A `put` either fully creates/overwrites the object or fails without
/// leaving a partial object visible. Implementations never retry; the
/// caller owns any retry policy.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;
}

/// In-memory store for tests. Records every successful put and can be
/// primed to fail the next N uploads.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    attempts: AtomicUsize,
    failures_remaining: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` uploads fail with a permission error.
    pub fn fail_next(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Total `put` calls observed, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("object map lock").len()
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().expect("object map lock").get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(StorageError::PermissionDenied {
                bucket: "memory".to_string(),
                key: key.to_string(),
            });
        }

        self.objects.lock().expect("object map lock").insert(
            key.to_string(),
            StoredObject { bytes, content_type: content_type.to_string() },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryObjectStore, ObjectStore, StorageError};

    #[tokio::test]
    async fn put_stores_bytes_under_key() {
        let store = MemoryObjectStore::new();
        store
            .put("proposal.pdf", b"%PDF-1.7 fake".to_vec(), "application/pdf")
            .await
            .expect("put should succeed");

        let stored = store.get("proposal.pdf").expect("object should exist");
        assert_eq!(stored.content_type, "application/pdf");
        assert!(stored.bytes.starts_with(b"%PDF"));
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn second_put_overwrites_first() {
        let store = MemoryObjectStore::new();
        store.put("proposal.pdf", b"first".to_vec(), "application/pdf").await.unwrap();
        store.put("proposal.pdf", b"second".to_vec(), "application/pdf").await.unwrap();

        assert_eq!(store.object_count(), 1, "same key must hold a single object");
        assert_eq!(store.get("proposal.pdf").unwrap().bytes, b"second".to_vec());
        assert_eq!(store.attempts(), 2);
    }

    #[tokio::test]
    async fn primed_failure_rejects_without_storing() {
        let store = MemoryObjectStore::new();
        store.fail_next(1);

        let error = store
            .put("proposal.pdf", b"doomed".to_vec(), "application/pdf")
            .await
            .expect_err("primed failure should reject");
        assert!(matches!(error, StorageError::PermissionDenied { .. }));
        assert_eq!(store.object_count(), 0, "failed put must not leave a partial object");

        store.put("proposal.pdf", b"ok".to_vec(), "application/pdf").await.unwrap();
        assert_eq!(store.object_count(), 1);
    }
}
