//! In-memory storage that records every call the API makes.

use async_trait::async_trait;
use bytes::Bytes;
use reeldrop_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Default)]
pub struct RecordingStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    puts: AtomicUsize,
    signs: AtomicUsize,
    fail_puts: AtomicBool,
    fail_signs: AtomicBool,
}

impl RecordingStorage {
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn signs(&self) -> usize {
        self.signs.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    pub fn fail_signs(&self) {
        self.fail_signs.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("connection reset by store".to_string()));
        }
        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presigned_put_url(
        &self,
        storage_key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.signs.fetch_add(1, Ordering::SeqCst);
        if self.fail_signs.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("credentials rejected".to_string()));
        }
        Ok(format!(
            "https://store.test/recordings/{}?X-Amz-Expires={}&X-Amz-Signature=test",
            storage_key,
            expires_in.as_secs()
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
