//! Filesystem helpers shared by the on-disk stores

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Atomic write helper
///
/// Writes data to a temporary file, fsyncs it, then renames it to the target
/// path. Every reference, staging, commit, and blob write goes through this so
/// a crash mid-write never leaves a half-written file at the target path.
pub(crate) fn atomic_write(tmp_dir: &Path, target: &Path, data: &[u8]) -> Result<()> {
    fs::create_dir_all(tmp_dir)?;

    let tmp_name = format!(
        "{}-{}",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let tmp_path = tmp_dir.join(tmp_name);

    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(data)?;
    tmp_file.sync_all()?; // fsync file
    drop(tmp_file);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    // Rename to target (atomic on POSIX systems)
    fs::rename(&tmp_path, target)?;

    // Fsync parent directory for durability
    if let Some(parent) = target.parent() {
        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let tmp_dir = temp_dir.path().join("tmp");
        let target = temp_dir.path().join("output").join("test.txt");

        let data = b"test atomic write content";
        atomic_write(&tmp_dir, &target, data)?;

        assert!(target.exists());
        assert_eq!(std::fs::read(&target)?, data);

        // The temp file must not linger at the target's side
        for entry in std::fs::read_dir(&tmp_dir)? {
            assert_ne!(entry?.path(), target);
        }

        Ok(())
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let tmp_dir = temp_dir.path().join("tmp");
        let target = temp_dir.path().join("a").join("b").join("file.txt");

        atomic_write(&tmp_dir, &target, b"nested")?;

        assert!(target.exists());
        assert_eq!(std::fs::read(&target)?, b"nested");
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let tmp_dir = temp_dir.path().join("tmp");
        let target = temp_dir.path().join("file.txt");

        atomic_write(&tmp_dir, &target, b"first")?;
        atomic_write(&tmp_dir, &target, b"second")?;

        assert_eq!(std::fs::read(&target)?, b"second");
        Ok(())
    }
}
