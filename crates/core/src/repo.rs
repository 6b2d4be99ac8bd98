//! Repository handle, initialization, and commit consolidation
//!
//! There is no process-global "current repository" state: callers resolve a
//! [`Repository`] once per invocation and pass it to every operation.

use crate::blob::BlobStore;
use crate::commit::{Commit, CommitStore};
use crate::error::{Error, Result};
use crate::hash::{hash_bytes, ObjectId};
use crate::refs::RefStore;
use crate::stage::StagingArea;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the hidden metadata directory at the repository root
pub const META_DIR: &str = ".strand";

/// Branch created by `init` and pointed at by the initial HEAD
pub const DEFAULT_BRANCH: &str = "master";

/// Handle to an opened repository
///
/// Owns the four on-disk stores. All paths handed to or returned from the
/// repository are root-relative with `/` separators.
pub struct Repository {
    root: PathBuf,
    meta_dir: PathBuf,
    blobs: BlobStore,
    commits: CommitStore,
    refs: RefStore,
    stage: StagingArea,
}

/// What a commit consolidation did
pub struct CommitSummary {
    pub id: ObjectId,
    /// Staged files whose content differed from the previous commit
    pub changed: usize,
    /// Staged files with no entry in the previous commit
    pub created: usize,
}

/// Per-branch line of the repository summary
pub struct BranchSummary {
    pub name: String,
    /// Non-root commits reachable from the branch head
    pub commits: usize,
    pub current: bool,
}

/// Aggregate repository statistics for the `info` command
pub struct RepoSummary {
    pub root: PathBuf,
    pub first_commit: Commit,
    pub last_commit: Commit,
    pub tracked_files: usize,
    pub branches: Vec<BranchSummary>,
}

impl Repository {
    /// Initialize a new repository at `dir`
    ///
    /// Creates the metadata layout, an empty-manifest root commit, a
    /// `master` branch pointing at it, and HEAD pointing at `master`.
    pub fn init(dir: &Path) -> Result<Repository> {
        let meta_dir = dir.join(META_DIR);
        if meta_dir.exists() {
            return Err(Error::AlreadyInitialized(dir.to_path_buf()));
        }

        fs::create_dir_all(&meta_dir)?;
        fs::create_dir_all(meta_dir.join("commits"))?;
        fs::create_dir_all(meta_dir.join("blobs"))?;
        fs::create_dir_all(meta_dir.join("branches"))?;
        fs::create_dir_all(meta_dir.join("tags"))?;
        fs::create_dir_all(meta_dir.join("tmp"))?;
        fs::write(meta_dir.join("stage"), "")?;

        let repo = Self::open(dir)?;

        // Baseline commit: empty manifest, empty message and author
        let root_id =
            repo.commits
                .write(ObjectId::ZERO, "", "", Utc::now(), &BTreeMap::new())?;
        repo.refs.create_branch(DEFAULT_BRANCH, root_id)?;
        repo.refs.set_head(DEFAULT_BRANCH)?;

        tracing::debug!(root = %repo.root.display(), "initialized repository");
        Ok(repo)
    }

    /// Open the repository whose root is `dir`
    pub fn open(dir: &Path) -> Result<Repository> {
        let root = fs::canonicalize(dir)?;
        let meta_dir = root.join(META_DIR);
        if !meta_dir.is_dir() {
            return Err(Error::NotARepository);
        }

        Ok(Repository {
            blobs: BlobStore::new(meta_dir.clone()),
            commits: CommitStore::new(meta_dir.clone()),
            refs: RefStore::new(meta_dir.clone()),
            stage: StagingArea::new(meta_dir.clone(), root.clone()),
            meta_dir,
            root,
        })
    }

    /// Find the repository containing the current directory
    pub fn discover() -> Result<Repository> {
        Self::discover_from(&std::env::current_dir()?)
    }

    /// Find the repository by walking up from `start`
    pub fn discover_from(start: &Path) -> Result<Repository> {
        let mut current = fs::canonicalize(start)?;
        loop {
            if current.join(META_DIR).is_dir() {
                return Self::open(&current);
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(Error::NotARepository),
            }
        }
    }

    /// Repository root (canonicalized)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metadata directory path
    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn commits(&self) -> &CommitStore {
        &self.commits
    }

    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    pub fn stage(&self) -> &StagingArea {
        &self.stage
    }

    /// The commit the active branch points at, manifest included
    pub fn head_commit(&self) -> Result<Commit> {
        let id = self.refs.head_commit()?;
        self.commits.read(id)
    }

    /// Consolidate the staging area into a new commit on the active branch
    ///
    /// The new manifest is HEAD's manifest overlaid with the staged paths:
    /// staged files unknown to HEAD are "created", staged files whose content
    /// changed are "changed", and staged files identical to their committed
    /// version keep the old entry. The stage is cleared and the branch
    /// advanced only after the commit record is durably on disk, so a failed
    /// write never loses the stage.
    pub fn commit_staged(&self, message: &str, author: &str) -> Result<CommitSummary> {
        let branch = self.refs.head()?;
        let head_id = self.refs.resolve_branch(&branch)?;
        let head = self.commits.read(head_id)?;

        let mut manifest = head.manifest.clone();
        let mut changed = 0;
        let mut created = 0;

        for path in self.stage.staged()? {
            let file = self.root.join(&path);
            if !file.is_file() {
                return Err(Error::NotFound(path));
            }
            let data = fs::read(&file)?;
            let id = hash_bytes(&data);

            let prior = manifest.get(path.as_str()).copied();
            match prior {
                Some(existing) if existing == id => {} // unchanged since last commit
                Some(_) => {
                    self.blobs.put(&data)?;
                    manifest.insert(path, id);
                    changed += 1;
                }
                None => {
                    self.blobs.put(&data)?;
                    manifest.insert(path, id);
                    created += 1;
                }
            }
        }

        let id = self
            .commits
            .write(head_id, message, author, Utc::now(), &manifest)?;

        self.stage.clear()?;
        self.refs.set_branch(&branch, id)?;

        tracing::debug!(id = %id, changed, created, "committed staged changes");
        Ok(CommitSummary { id, changed, created })
    }

    /// Aggregate statistics for the `info` command
    pub fn summary(&self) -> Result<RepoSummary> {
        let head_name = self.refs.head()?;
        let last_commit = self.head_commit()?;

        // Walk down to the baseline commit for the first-commit date. The
        // walk is bounded like the ancestors iterator.
        let mut first = self.commits.read_header(last_commit.id)?;
        let mut guard = self.commits.count()?;
        while !first.is_root() {
            if guard == 0 {
                return Err(Error::CorruptGraph(
                    "ancestry exceeds the stored commit count (cycle?)".to_string(),
                ));
            }
            guard -= 1;
            first = self.commits.read_header(first.parent)?;
        }

        let mut branches = Vec::new();
        for (name, id) in self.refs.branches()? {
            let mut commits = 0;
            for commit in self.commits.ancestors(id)? {
                commit?;
                commits += 1;
            }
            branches.push(BranchSummary {
                current: name == head_name,
                name,
                commits,
            });
        }

        Ok(RepoSummary {
            root: self.root.clone(),
            tracked_files: last_commit.manifest.len(),
            first_commit: first,
            last_commit,
            branches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_layout() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let repo = Repository::init(tmp.path())?;

        let meta = repo.meta_dir();
        assert!(meta.join("commits").is_dir());
        assert!(meta.join("blobs").is_dir());
        assert!(meta.join("branches").is_dir());
        assert!(meta.join("tags").is_dir());
        assert!(meta.join("stage").is_file());
        assert!(meta.join("head").is_file());
        Ok(())
    }

    #[test]
    fn test_init_creates_root_commit_and_master() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let repo = Repository::init(tmp.path())?;

        assert_eq!(repo.refs().head()?, DEFAULT_BRANCH);

        let head = repo.head_commit()?;
        assert!(head.is_root());
        assert!(head.manifest.is_empty());
        Ok(())
    }

    #[test]
    fn test_init_twice_fails() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        Repository::init(tmp.path())?;

        match Repository::init(tmp.path()) {
            Err(Error::AlreadyInitialized(_)) => Ok(()),
            other => panic!("expected AlreadyInitialized, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_discover_from_subdirectory() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        Repository::init(tmp.path())?;
        fs::create_dir_all(tmp.path().join("src/deep"))?;

        let repo = Repository::discover_from(&tmp.path().join("src/deep"))?;
        assert_eq!(repo.root(), fs::canonicalize(tmp.path())?);
        Ok(())
    }

    #[test]
    fn test_discover_outside_any_repo() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        match Repository::discover_from(tmp.path()) {
            Err(Error::NotARepository) => Ok(()),
            other => panic!("expected NotARepository, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_commit_staged_counts_created_and_changed() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let repo = Repository::init(tmp.path())?;
        let root_id = repo.refs().head_commit()?;

        fs::write(tmp.path().join("a.txt"), "hello")?;
        repo.stage().stage(&[tmp.path().join("a.txt")])?;

        let first = repo.commit_staged("first", "tester <t@example.com>")?;
        assert_eq!(first.created, 1);
        assert_eq!(first.changed, 0);

        let commit = repo.commits().read(first.id)?;
        assert_eq!(commit.parent, root_id);
        assert_eq!(
            commit.manifest.get("a.txt").copied(),
            Some(hash_bytes(b"hello"))
        );
        // Stage cleared, branch advanced
        assert!(repo.stage().staged()?.is_empty());
        assert_eq!(repo.refs().head_commit()?, first.id);

        // Change the file, stage, commit again
        fs::write(tmp.path().join("a.txt"), "world")?;
        repo.stage().stage(&[tmp.path().join("a.txt")])?;
        let second = repo.commit_staged("second", "tester <t@example.com>")?;
        assert_eq!(second.created, 0);
        assert_eq!(second.changed, 1);

        let commit = repo.commits().read(second.id)?;
        assert_eq!(commit.parent, first.id);
        assert_eq!(
            commit.manifest.get("a.txt").copied(),
            Some(hash_bytes(b"world"))
        );
        Ok(())
    }

    #[test]
    fn test_commit_unchanged_staged_file_keeps_entry() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let repo = Repository::init(tmp.path())?;

        fs::write(tmp.path().join("a.txt"), "same")?;
        repo.stage().stage(&[tmp.path().join("a.txt")])?;
        repo.commit_staged("first", "tester")?;

        // Stage again without modifying
        repo.stage().stage(&[tmp.path().join("a.txt")])?;
        let summary = repo.commit_staged("second", "tester")?;
        assert_eq!(summary.created, 0);
        assert_eq!(summary.changed, 0);

        let head = repo.head_commit()?;
        assert_eq!(
            head.manifest.get("a.txt").copied(),
            Some(hash_bytes(b"same"))
        );
        Ok(())
    }

    #[test]
    fn test_summary() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let repo = Repository::init(tmp.path())?;

        fs::write(tmp.path().join("a.txt"), "one")?;
        repo.stage().stage(&[tmp.path().join("a.txt")])?;
        repo.commit_staged("first", "tester")?;

        fs::write(tmp.path().join("b.txt"), "two")?;
        repo.stage().stage(&[tmp.path().join("b.txt")])?;
        repo.commit_staged("second", "tester")?;

        let summary = repo.summary()?;
        assert_eq!(summary.tracked_files, 2);
        assert!(summary.first_commit.is_root());
        assert_eq!(summary.last_commit.message, "second");
        assert_eq!(summary.branches.len(), 1);
        assert_eq!(summary.branches[0].name, DEFAULT_BRANCH);
        assert_eq!(summary.branches[0].commits, 2);
        assert!(summary.branches[0].current);
        Ok(())
    }
}
