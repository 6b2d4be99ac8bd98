//! Strand core - content-addressed storage and the linear commit graph
//!
//! This crate provides the object model for the strand version-control tool:
//! - SHA-256 content hashing and the blob store
//! - Line-oriented commit records and bounded ancestry traversal
//! - Branch/tag/HEAD reference resolution
//! - The staging area and staging-to-commit consolidation
//! - Working-tree reconciliation (checkout) and line-diff orchestration

pub mod blob;
pub mod commit;
pub mod diff;
pub mod error;
pub mod hash;
pub mod refs;
pub mod repo;
pub mod stage;
pub mod worktree;

mod fsutil;

// Re-export main types for convenience
pub use blob::BlobStore;
pub use commit::{Commit, CommitStore};
pub use diff::{DiffLine, FileDiff};
pub use error::{Error, RefKind, Result};
pub use hash::{hash_bytes, hash_file, ObjectId};
pub use refs::RefStore;
pub use repo::{BranchSummary, CommitSummary, RepoSummary, Repository, DEFAULT_BRANCH, META_DIR};
pub use stage::{StageOutcome, StagingArea};
pub use worktree::{Checkout, WorktreeStatus};
