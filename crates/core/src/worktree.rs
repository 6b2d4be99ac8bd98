//! Working-tree reconciliation and snapshot scanning

use crate::error::{Error, Result};
use crate::hash::{hash_file, ObjectId};
use crate::repo::{Repository, META_DIR};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Result of comparing the working tree against a commit manifest
#[derive(Debug, Default)]
pub struct WorktreeStatus {
    /// Tracked files whose on-disk content no longer matches the manifest
    pub modified: Vec<String>,
    /// Tracked files that have been deleted from the working tree
    pub missing: Vec<String>,
}

/// Outcome of a checkout attempt
#[derive(Debug, PartialEq, Eq)]
pub enum Checkout {
    Completed { written: usize, deleted: usize },
    /// The user declined to overwrite a locally modified file; nothing was
    /// touched.
    Aborted,
}

/// Compare every manifest entry against the working tree
///
/// `modified` carries hash mismatches only; files that are gone from disk are
/// reported separately in `missing` rather than silently skipped.
pub fn status_scan(
    repo: &Repository,
    manifest: &std::collections::BTreeMap<String, ObjectId>,
) -> Result<WorktreeStatus> {
    let mut status = WorktreeStatus::default();

    for (path, id) in manifest {
        let file = repo.root().join(path);
        if !file.is_file() {
            status.missing.push(path.clone());
            continue;
        }
        if hash_file(&file)? != *id {
            status.modified.push(path.clone());
        }
    }

    Ok(status)
}

/// Reconcile the working tree with the target branch's snapshot
///
/// `confirm` is consulted once per locally modified file before anything is
/// touched; returning false aborts the whole operation with zero side
/// effects. The reconciliation itself is not transactional: a write failure
/// mid-way leaves the tree partially updated with HEAD unchanged.
pub fn checkout<F>(repo: &Repository, branch: &str, mut confirm: F) -> Result<Checkout>
where
    F: FnMut(&str) -> bool,
{
    // 1. Resolve both ends before touching anything
    let head = repo.head_commit()?;
    let target_id = repo.refs().resolve_branch(branch)?;
    let target = repo.commits().read(target_id)?;

    // 2. Locally modified files need explicit consent
    for (path, id) in &head.manifest {
        let file = repo.root().join(path);
        if file.is_file() && hash_file(&file)? != *id && !confirm(path) {
            return Ok(Checkout::Aborted);
        }
    }

    // 3. Delete tracked files with no counterpart in the target. Only paths
    //    known to HEAD or the target are candidates; untracked files survive.
    let union: BTreeSet<&str> = head
        .manifest
        .keys()
        .chain(target.manifest.keys())
        .map(String::as_str)
        .collect();

    let mut deleted = 0;
    for entry in WalkDir::new(repo.root())
        .into_iter()
        .filter_entry(|e| e.file_name() != META_DIR)
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = relative_key(repo.root(), entry.path())?;
        if union.contains(rel.as_str()) && !target.manifest.contains_key(rel.as_str()) {
            fs::remove_file(entry.path())?;
            deleted += 1;
        }
    }

    // 4. Materialize the target snapshot, skipping files that are already
    //    current so a clean re-checkout rewrites nothing
    let mut written = 0;
    for (path, id) in &target.manifest {
        let file = repo.root().join(path);
        if file.is_file() && hash_file(&file)? == *id {
            continue;
        }

        let data = repo.blobs().get(*id)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, &data)?;
        // Carry the stored blob's permission bits onto the working file
        let perms = fs::metadata(repo.blobs().blob_path(*id))?.permissions();
        fs::set_permissions(&file, perms)?;
        written += 1;
    }

    // 5. Point HEAD at the target branch
    repo.refs().set_head(branch)?;

    tracing::debug!(branch, written, deleted, "checkout complete");
    Ok(Checkout::Completed { written, deleted })
}

fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| Error::OutsideRepo(path.to_path_buf()))?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}
