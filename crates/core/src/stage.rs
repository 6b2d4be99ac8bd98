//! Staging area for the next commit

use crate::error::{Error, Result};
use crate::fsutil::atomic_write;
use crate::repo::META_DIR;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered, deduplicated set of paths pending inclusion in the next commit
///
/// Persisted as a newline-delimited list in the `stage` file; cleared
/// atomically when a commit succeeds.
pub struct StagingArea {
    /// Path to the metadata directory
    meta_dir: PathBuf,
    /// Canonicalized repository root
    root: PathBuf,
}

/// Result of a best-effort staging pass
///
/// Staging is not all-or-nothing: each rejected path is reported alongside
/// the paths that did get staged.
pub struct StageOutcome {
    /// Newly staged root-relative paths (already-staged paths are skipped)
    pub staged: Vec<String>,
    /// Paths that could not be staged, with the reason
    pub rejected: Vec<(PathBuf, Error)>,
}

impl StagingArea {
    /// Create a staging area for the given metadata dir and repository root
    pub fn new(meta_dir: PathBuf, root: PathBuf) -> Self {
        Self { meta_dir, root }
    }

    /// Stage the given paths, best-effort
    ///
    /// Each path is canonicalized to a root-relative `/`-separated form.
    /// Paths outside the repository, directories, and nonexistent paths are
    /// rejected individually while the rest are processed. Staging a path
    /// that is already staged is a no-op.
    pub fn stage(&self, paths: &[PathBuf]) -> Result<StageOutcome> {
        let mut entries = self.staged()?;
        let mut seen: HashSet<String> = entries.iter().cloned().collect();
        let mut outcome = StageOutcome {
            staged: Vec::new(),
            rejected: Vec::new(),
        };

        for path in paths {
            match canonicalize_rel(&self.root, path) {
                Ok(rel) => {
                    if seen.insert(rel.clone()) {
                        entries.push(rel.clone());
                        outcome.staged.push(rel);
                    }
                }
                Err(err) => outcome.rejected.push((path.clone(), err)),
            }
        }

        self.persist(&entries)?;
        tracing::debug!(
            staged = outcome.staged.len(),
            rejected = outcome.rejected.len(),
            "updated stage"
        );
        Ok(outcome)
    }

    /// Currently staged paths, in staging order
    pub fn staged(&self) -> Result<Vec<String>> {
        let path = self.stage_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(content
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Truncate the staged list
    ///
    /// Invoked exactly once per successful commit, after the commit record is
    /// safely on disk.
    pub fn clear(&self) -> Result<()> {
        atomic_write(&self.meta_dir.join("tmp"), &self.stage_path(), b"")
    }

    fn persist(&self, entries: &[String]) -> Result<()> {
        let mut content = entries.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        atomic_write(
            &self.meta_dir.join("tmp"),
            &self.stage_path(),
            content.as_bytes(),
        )
    }

    fn stage_path(&self) -> PathBuf {
        self.meta_dir.join("stage")
    }
}

/// Canonicalize a user-supplied path to the repository-relative form
///
/// This is the single path-equality rule: staging, the modified-file scan,
/// and checkout all compare paths in this form (relative to the repository
/// root, `/`-separated).
pub fn canonicalize_rel(root: &Path, path: &Path) -> Result<String> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(path.display().to_string()))
        }
        Err(err) => return Err(err.into()),
    };
    if metadata.is_dir() {
        return Err(Error::IsADirectory(path.to_path_buf()));
    }

    let abs = fs::canonicalize(path)?;
    let rel = abs
        .strip_prefix(root)
        .map_err(|_| Error::OutsideRepo(path.to_path_buf()))?;

    // The metadata directory is not part of the tracked tree
    if rel.starts_with(META_DIR) {
        return Err(Error::OutsideRepo(path.to_path_buf()));
    }

    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, StagingArea) {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        let meta_dir = root.join(META_DIR);
        fs::create_dir_all(&meta_dir).unwrap();
        let stage = StagingArea::new(meta_dir, root);
        (temp_dir, stage)
    }

    #[test]
    fn test_stage_and_list() -> Result<()> {
        let (tmp, stage) = setup();
        fs::write(tmp.path().join("a.txt"), "hello")?;
        fs::write(tmp.path().join("b.txt"), "world")?;

        let outcome = stage.stage(&[
            tmp.path().join("a.txt"),
            tmp.path().join("b.txt"),
        ])?;
        assert_eq!(outcome.staged, vec!["a.txt", "b.txt"]);
        assert!(outcome.rejected.is_empty());
        assert_eq!(stage.staged()?, vec!["a.txt", "b.txt"]);
        Ok(())
    }

    #[test]
    fn test_staging_twice_is_idempotent() -> Result<()> {
        let (tmp, stage) = setup();
        fs::write(tmp.path().join("a.txt"), "hello")?;

        stage.stage(&[tmp.path().join("a.txt")])?;
        stage.stage(&[tmp.path().join("a.txt")])?;

        assert_eq!(stage.staged()?, vec!["a.txt"]);
        Ok(())
    }

    #[test]
    fn test_canonical_equality_dedups() -> Result<()> {
        let (tmp, stage) = setup();
        fs::create_dir(tmp.path().join("src"))?;
        fs::write(tmp.path().join("src/lib.rs"), "x")?;

        // Same file through two spellings
        stage.stage(&[
            tmp.path().join("src/lib.rs"),
            tmp.path().join("src/../src/lib.rs"),
        ])?;

        assert_eq!(stage.staged()?, vec!["src/lib.rs"]);
        Ok(())
    }

    #[test]
    fn test_rejections_do_not_abort() -> Result<()> {
        let (tmp, stage) = setup();
        fs::write(tmp.path().join("good.txt"), "ok")?;
        fs::create_dir(tmp.path().join("dir"))?;

        let outside = tempfile::tempdir()?;
        fs::write(outside.path().join("far.txt"), "far")?;

        let outcome = stage.stage(&[
            tmp.path().join("missing.txt"),
            tmp.path().join("dir"),
            outside.path().join("far.txt"),
            tmp.path().join("good.txt"),
        ])?;

        assert_eq!(outcome.staged, vec!["good.txt"]);
        assert_eq!(outcome.rejected.len(), 3);
        assert!(matches!(outcome.rejected[0].1, Error::NotFound(_)));
        assert!(matches!(outcome.rejected[1].1, Error::IsADirectory(_)));
        assert!(matches!(outcome.rejected[2].1, Error::OutsideRepo(_)));

        assert_eq!(stage.staged()?, vec!["good.txt"]);
        Ok(())
    }

    #[test]
    fn test_metadata_dir_rejected() -> Result<()> {
        let (tmp, stage) = setup();
        fs::write(tmp.path().join(META_DIR).join("stage"), "")?;

        let outcome = stage.stage(&[tmp.path().join(META_DIR).join("stage")])?;
        assert!(outcome.staged.is_empty());
        assert!(matches!(outcome.rejected[0].1, Error::OutsideRepo(_)));
        Ok(())
    }

    #[test]
    fn test_clear() -> Result<()> {
        let (tmp, stage) = setup();
        fs::write(tmp.path().join("a.txt"), "hello")?;

        stage.stage(&[tmp.path().join("a.txt")])?;
        assert!(!stage.staged()?.is_empty());

        stage.clear()?;
        assert!(stage.staged()?.is_empty());
        Ok(())
    }
}
