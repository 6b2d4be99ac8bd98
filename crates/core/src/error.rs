//! Error taxonomy for strand-core (spec §7).
//!
//! A `thiserror`-derived [`Error`] enum covers every failure mode the object
//! model can surface. Per-item validation failures (`NotFound`,
//! `IsADirectory`, `OutsideRepo`) are reported and skipped by the staging
//! layer; structural failures (`CorruptObject`, `CorruptGraph`,
//! `NotARepository`) are fatal. `Io` transparently wraps `std::io::Error` so
//! filesystem helpers can use `?`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Whether a reference names a branch or a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A movable branch reference.
    Branch,
    /// An immutable tag reference.
    Tag,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Branch => f.write_str("branch"),
            RefKind::Tag => f.write_str("tag"),
        }
    }
}

/// Every failure mode of the strand object model.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested object, path, or staged file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A branch or tag was requested that has never been created.
    #[error("unknown {0} '{1}'")]
    UnknownRef(RefKind, String),

    /// Attempted to create a branch or tag that already exists.
    #[error("{0} '{1}' already exists")]
    RefExists(RefKind, String),

    /// A path resolves outside the repository root (or into the metadata dir).
    #[error("path is outside the repository: {}", .0.display())]
    OutsideRepo(PathBuf),

    /// A directory was supplied where a file was expected.
    #[error("is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    /// A stored object could not be decoded.
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// The commit graph is structurally invalid (e.g. a cycle).
    #[error("corrupt graph: {0}")]
    CorruptGraph(String),

    /// No `.strand/` directory was found walking up from the cwd.
    #[error("not a strand repository")]
    NotARepository,

    /// `init` was run inside an already-initialized repository.
    #[error("already a strand repository: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// Input validation failed at the API edge (framing, reference names).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results produced by strand-core.
pub type Result<T> = std::result::Result<T, Error>;
