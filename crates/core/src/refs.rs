//! Branch, tag, and HEAD reference storage

use crate::error::{Error, RefKind, Result};
use crate::fsutil::atomic_write;
use crate::hash::ObjectId;
use std::fs;
use std::path::PathBuf;

/// Name-to-commit indirection for branches, tags, and HEAD
///
/// Branches are mutable pointers (`branches/<name>`), tags are create-only
/// (`tags/<name>`), and `head` names the active branch. Every file holds a
/// single line; every write goes through the atomic-replace helper.
pub struct RefStore {
    /// Path to the metadata directory
    meta_dir: PathBuf,
}

impl RefStore {
    /// Create a ref store rooted at the metadata directory
    pub fn new(meta_dir: PathBuf) -> Self {
        Self { meta_dir }
    }

    // Branches

    /// Resolve a branch name to its commit id
    pub fn resolve_branch(&self, name: &str) -> Result<ObjectId> {
        self.read_ref(RefKind::Branch, name)
    }

    /// Create a new branch pointing at `start`
    pub fn create_branch(&self, name: &str, start: ObjectId) -> Result<()> {
        validate_name(name)?;
        if self.branch_path(name).exists() {
            return Err(Error::RefExists(RefKind::Branch, name.to_string()));
        }
        self.write_ref(&self.branch_path(name), start)?;
        tracing::debug!(branch = name, id = %start, "created branch");
        Ok(())
    }

    /// Move an existing branch to a new commit
    pub fn set_branch(&self, name: &str, id: ObjectId) -> Result<()> {
        if !self.branch_path(name).exists() {
            return Err(Error::UnknownRef(RefKind::Branch, name.to_string()));
        }
        self.write_ref(&self.branch_path(name), id)?;
        tracing::debug!(branch = name, id = %id, "advanced branch");
        Ok(())
    }

    /// List all branches, sorted by name
    pub fn branches(&self) -> Result<Vec<(String, ObjectId)>> {
        self.list(self.meta_dir.join("branches"), RefKind::Branch)
    }

    // Tags

    /// Resolve a tag name to its commit id
    pub fn resolve_tag(&self, name: &str) -> Result<ObjectId> {
        self.read_ref(RefKind::Tag, name)
    }

    /// Create a new tag; tags have no update path
    pub fn create_tag(&self, name: &str, id: ObjectId) -> Result<()> {
        validate_name(name)?;
        if self.tag_path(name).exists() {
            return Err(Error::RefExists(RefKind::Tag, name.to_string()));
        }
        self.write_ref(&self.tag_path(name), id)?;
        tracing::debug!(tag = name, id = %id, "created tag");
        Ok(())
    }

    /// List all tags, sorted by name
    pub fn tags(&self) -> Result<Vec<(String, ObjectId)>> {
        self.list(self.meta_dir.join("tags"), RefKind::Tag)
    }

    // HEAD

    /// Name of the branch HEAD points at
    pub fn head(&self) -> Result<String> {
        let path = self.meta_dir.join("head");
        let content = fs::read_to_string(&path)
            .map_err(|_| Error::CorruptObject("head file missing or unreadable".to_string()))?;
        let name = content.trim_end_matches('\n').to_string();
        if !self.branch_path(&name).exists() {
            return Err(Error::UnknownRef(RefKind::Branch, name));
        }
        Ok(name)
    }

    /// Point HEAD at an existing branch
    pub fn set_head(&self, name: &str) -> Result<()> {
        if !self.branch_path(name).exists() {
            return Err(Error::UnknownRef(RefKind::Branch, name.to_string()));
        }
        let tmp_dir = self.meta_dir.join("tmp");
        atomic_write(
            &tmp_dir,
            &self.meta_dir.join("head"),
            format!("{}\n", name).as_bytes(),
        )
    }

    /// Commit id of the active branch
    pub fn head_commit(&self) -> Result<ObjectId> {
        let name = self.head()?;
        self.resolve_branch(&name)
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.meta_dir.join("branches").join(name)
    }

    fn tag_path(&self, name: &str) -> PathBuf {
        self.meta_dir.join("tags").join(name)
    }

    fn read_ref(&self, kind: RefKind, name: &str) -> Result<ObjectId> {
        let path = match kind {
            RefKind::Branch => self.branch_path(name),
            RefKind::Tag => self.tag_path(name),
        };
        if !path.exists() {
            return Err(Error::UnknownRef(kind, name.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        ObjectId::from_hex(content.trim_end_matches('\n'))
            .map_err(|_| Error::CorruptObject(format!("{} '{}' holds an invalid id", kind, name)))
    }

    fn write_ref(&self, path: &PathBuf, id: ObjectId) -> Result<()> {
        let tmp_dir = self.meta_dir.join("tmp");
        atomic_write(&tmp_dir, path, format!("{}\n", id.to_hex()).as_bytes())
    }

    fn list(&self, dir: PathBuf, kind: RefKind) -> Result<Vec<(String, ObjectId)>> {
        let mut refs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let id = self.read_ref(kind, &name)?;
            refs.push((name, id));
        }
        // Directory order is not deterministic; impose one.
        refs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(refs)
    }
}

/// Reference names become file names, so anything path-like is rejected
fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "invalid reference name '{}'",
            name
        )))
    }
}
