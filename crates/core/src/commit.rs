//! Commit records and the linear commit graph

use crate::error::{Error, Result};
use crate::fsutil::atomic_write;
use crate::hash::{hash_bytes, ObjectId};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// A single immutable commit
///
/// `parent` is the all-zero sentinel for the root commit; every other commit
/// points at exactly one existing commit, so ancestry is a strict chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: ObjectId,
    pub parent: ObjectId,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Snapshot manifest: root-relative path -> blob id
    pub manifest: BTreeMap<String, ObjectId>,
}

impl Commit {
    /// Whether this is the root commit
    pub fn is_root(&self) -> bool {
        self.parent.is_zero()
    }
}

/// On-disk store of commit records under `commits/<hex id>`
///
/// The stored form is line-oriented:
/// ```text
/// <parent hex id>          all-zero = root
/// <message>
/// <author>
/// <RFC3339 timestamp>
/// <blob hex id> <path>     one line per manifest entry
/// ```
/// The commit id is the SHA-256 of these bytes, so identical records always
/// collapse to the same id.
pub struct CommitStore {
    /// Path to the metadata directory
    meta_dir: PathBuf,
}

impl CommitStore {
    /// Create a commit store rooted at the metadata directory
    pub fn new(meta_dir: PathBuf) -> Self {
        Self { meta_dir }
    }

    /// Serialize and persist a commit, returning its id
    ///
    /// Message and author must not contain newlines: the encoding is
    /// line-framed and an embedded newline would shift every following field.
    pub fn write(
        &self,
        parent: ObjectId,
        message: &str,
        author: &str,
        timestamp: DateTime<Utc>,
        manifest: &BTreeMap<String, ObjectId>,
    ) -> Result<ObjectId> {
        if message.contains('\n') || message.contains('\r') {
            return Err(Error::InvalidInput(
                "commit message must not contain newlines".to_string(),
            ));
        }
        if author.contains('\n') || author.contains('\r') {
            return Err(Error::InvalidInput(
                "commit author must not contain newlines".to_string(),
            ));
        }
        if let Some((path, _)) = manifest
            .iter()
            .find(|(path, _)| path.contains('\n') || path.contains('\r'))
        {
            return Err(Error::InvalidInput(format!(
                "manifest path {:?} contains newlines",
                path
            )));
        }

        let mut record = String::new();
        record.push_str(&parent.to_hex());
        record.push('\n');
        record.push_str(message);
        record.push('\n');
        record.push_str(author);
        record.push('\n');
        record.push_str(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true));
        record.push('\n');
        for (path, id) in manifest {
            record.push_str(&id.to_hex());
            record.push(' ');
            record.push_str(path);
            record.push('\n');
        }

        let id = hash_bytes(record.as_bytes());
        let path = self.commit_path(id);

        if !path.exists() {
            let tmp_dir = self.meta_dir.join("tmp");
            atomic_write(&tmp_dir, &path, record.as_bytes())?;
            tracing::debug!(id = %id, entries = manifest.len(), "wrote commit");
        }

        Ok(id)
    }

    /// Read a full commit record, manifest included
    pub fn read(&self, id: ObjectId) -> Result<Commit> {
        self.load(id, true)
    }

    /// Read a commit's header only (fast path for history listing)
    ///
    /// The returned commit has an empty manifest.
    pub fn read_header(&self, id: ObjectId) -> Result<Commit> {
        self.load(id, false)
    }

    /// Check whether a commit exists
    pub fn contains(&self, id: ObjectId) -> bool {
        self.commit_path(id).exists()
    }

    /// Total number of stored commits
    pub fn count(&self) -> Result<usize> {
        Ok(fs::read_dir(self.dir())?.count())
    }

    /// All stored commit ids, sorted for deterministic output
    pub fn list_ids(&self) -> Result<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.dir())? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            ids.push(ObjectId::from_hex(&name).map_err(|_| {
                Error::CorruptObject(format!("unexpected file in commits directory: {}", name))
            })?);
        }
        ids.sort();
        Ok(ids)
    }

    /// Walk parent pointers from `id` towards the root
    ///
    /// Yields non-root commits only, newest first, stopping before the zero
    /// sentinel. The walk is bounded by the stored commit count so a corrupt
    /// (cyclic) chain fails with `CorruptGraph` instead of looping forever.
    pub fn ancestors(&self, id: ObjectId) -> Result<Ancestors<'_>> {
        Ok(Ancestors {
            store: self,
            next: Some(id),
            remaining: self.count()?,
        })
    }

    fn dir(&self) -> PathBuf {
        self.meta_dir.join("commits")
    }

    fn commit_path(&self, id: ObjectId) -> PathBuf {
        self.dir().join(id.to_hex())
    }

    fn load(&self, id: ObjectId, with_manifest: bool) -> Result<Commit> {
        let path = self.commit_path(id);
        if !path.exists() {
            return Err(Error::NotFound(id.to_hex()));
        }

        let bytes = fs::read(&path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| Error::CorruptObject(format!("commit {} is not valid UTF-8", id)))?;

        parse_commit(id, &text, with_manifest)
    }
}

fn parse_commit(id: ObjectId, text: &str, with_manifest: bool) -> Result<Commit> {
    let mut lines = text.lines();

    let parent_line = lines
        .next()
        .ok_or_else(|| truncated(id, "parent line missing"))?;
    let parent = ObjectId::from_hex(parent_line)
        .map_err(|_| Error::CorruptObject(format!("commit {}: invalid parent id", id)))?;

    let message = lines
        .next()
        .ok_or_else(|| truncated(id, "message line missing"))?
        .to_string();
    let author = lines
        .next()
        .ok_or_else(|| truncated(id, "author line missing"))?
        .to_string();

    let ts_line = lines
        .next()
        .ok_or_else(|| truncated(id, "timestamp line missing"))?;
    let timestamp = DateTime::parse_from_rfc3339(ts_line)
        .map_err(|e| Error::CorruptObject(format!("commit {}: invalid timestamp: {}", id, e)))?
        .with_timezone(&Utc);

    let mut manifest = BTreeMap::new();
    if with_manifest {
        for line in lines {
            let (hex, path) = line.split_once(' ').ok_or_else(|| {
                Error::CorruptObject(format!("commit {}: malformed manifest entry", id))
            })?;
            let blob_id = ObjectId::from_hex(hex).map_err(|_| {
                Error::CorruptObject(format!("commit {}: invalid manifest blob id", id))
            })?;
            manifest.insert(path.to_string(), blob_id);
        }
    }

    Ok(Commit {
        id,
        parent,
        message,
        author,
        timestamp,
        manifest,
    })
}

fn truncated(id: ObjectId, what: &str) -> Error {
    Error::CorruptObject(format!("commit {}: {}", id, what))
}

/// Lazy ancestry walk produced by [`CommitStore::ancestors`]
pub struct Ancestors<'a> {
    store: &'a CommitStore,
    next: Option<ObjectId>,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;

        let commit = match self.store.read_header(id) {
            Ok(commit) => commit,
            Err(err) => return Some(Err(err)),
        };

        if commit.is_root() {
            return None;
        }

        if self.remaining == 0 {
            return Some(Err(Error::CorruptGraph(format!(
                "ancestry of {} exceeds the stored commit count (cycle?)",
                id
            ))));
        }
        self.remaining -= 1;

        self.next = Some(commit.parent);
        Some(Ok(commit))
    }
}

/// Write a commit file with arbitrary (possibly bogus) content under an
/// arbitrary id. Test-only: lets corruption scenarios exist on disk.
#[cfg(test)]
fn write_raw(store: &CommitStore, id: ObjectId, content: &str) {
    fs::create_dir_all(store.dir()).unwrap();
    fs::write(store.commit_path(id), content).unwrap();
}
