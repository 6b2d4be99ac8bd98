//! Content-addressed blob storage

use crate::error::{Error, Result};
use crate::fsutil::atomic_write;
use crate::hash::{hash_bytes, ObjectId};
use std::fs;
use std::path::PathBuf;

/// Content-addressed store for raw file bytes
///
/// Blobs live under `blobs/<hex id>` inside the metadata directory. A blob is
/// written once under the hash of its content and never mutated or deleted;
/// re-putting identical content is a no-op.
pub struct BlobStore {
    /// Path to the metadata directory
    meta_dir: PathBuf,
}

impl BlobStore {
    /// Create a blob store rooted at the metadata directory
    pub fn new(meta_dir: PathBuf) -> Self {
        Self { meta_dir }
    }

    /// Store bytes under their content hash, returning the id
    ///
    /// Idempotent: if a blob with this content already exists the write is
    /// skipped entirely.
    pub fn put(&self, data: &[u8]) -> Result<ObjectId> {
        let id = hash_bytes(data);
        let path = self.blob_path(id);

        if path.exists() {
            return Ok(id); // Already stored, idempotent
        }

        let tmp_dir = self.meta_dir.join("tmp");
        atomic_write(&tmp_dir, &path, data)?;
        tracing::debug!(id = %id, bytes = data.len(), "stored blob");

        Ok(id)
    }

    /// Read a blob's bytes back by id
    pub fn get(&self, id: ObjectId) -> Result<Vec<u8>> {
        let path = self.blob_path(id);
        if !path.exists() {
            return Err(Error::NotFound(id.to_hex()));
        }

        let data = fs::read(&path)?;

        // Verify content still matches its id
        let actual = hash_bytes(&data);
        if actual != id {
            return Err(Error::CorruptObject(format!(
                "blob hash mismatch: expected {}, got {}",
                id, actual
            )));
        }

        Ok(data)
    }

    /// Check whether a blob exists
    pub fn contains(&self, id: ObjectId) -> bool {
        self.blob_path(id).exists()
    }

    /// Get the filesystem path for a blob
    pub fn blob_path(&self, id: ObjectId) -> PathBuf {
        self.meta_dir.join("blobs").join(id.to_hex())
    }

    /// Get the blobs directory
    pub fn dir(&self) -> PathBuf {
        self.meta_dir.join("blobs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, BlobStore) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(temp_dir.path().to_path_buf());
        (temp_dir, store)
    }

    #[test]
    fn test_put_get_roundtrip() -> Result<()> {
        let (_tmp, store) = store();

        let data = b"test data for blob store";
        let id = store.put(data)?;

        let read_back = store.get(id)?;
        assert_eq!(data, &read_back[..]);
        Ok(())
    }

    #[test]
    fn test_put_is_idempotent() -> Result<()> {
        let (tmp, store) = store();

        let data = b"same bytes";
        let id1 = store.put(data)?;
        let id2 = store.put(data)?;
        let id3 = store.put(data)?;

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);

        // Exactly one stored copy
        let entries = std::fs::read_dir(tmp.path().join("blobs"))?.count();
        assert_eq!(entries, 1);
        Ok(())
    }

    #[test]
    fn test_distinct_content_distinct_ids() -> Result<()> {
        let (_tmp, store) = store();

        let id1 = store.put(b"first blob")?;
        let id2 = store.put(b"second blob")?;

        assert_ne!(id1, id2);
        assert_eq!(store.get(id1)?, b"first blob");
        assert_eq!(store.get(id2)?, b"second blob");
        Ok(())
    }

    #[test]
    fn test_contains() -> Result<()> {
        let (_tmp, store) = store();

        let id = hash_bytes(b"not stored yet");
        assert!(!store.contains(id));

        store.put(b"not stored yet")?;
        assert!(store.contains(id));
        Ok(())
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (_tmp, store) = store();

        let missing = ObjectId::from_bytes([0xFF; 32]);
        match store.get(missing) {
            Err(Error::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_flat_file_layout() -> Result<()> {
        let (tmp, store) = store();

        let id = store.put(b"layout check")?;
        let expected = tmp.path().join("blobs").join(id.to_hex());
        assert!(expected.exists());
        Ok(())
    }

    #[test]
    fn test_empty_blob() -> Result<()> {
        let (_tmp, store) = store();

        let id = store.put(b"")?;
        assert_eq!(store.get(id)?, b"");
        Ok(())
    }

    #[test]
    fn test_tampered_blob_detected() -> Result<()> {
        let (tmp, store) = store();

        let id = store.put(b"original content")?;
        std::fs::write(tmp.path().join("blobs").join(id.to_hex()), b"tampered")?;

        match store.get(id) {
            Err(Error::CorruptObject(_)) => {}
            other => panic!("expected CorruptObject, got {:?}", other.map(|v| v.len())),
        }
        Ok(())
    }
}
