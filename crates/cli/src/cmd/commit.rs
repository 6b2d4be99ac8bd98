//! Commit staged changes

use anyhow::{Context, Result};
use strand_core::Repository;

/// Fixed author identity recorded on every commit
const AUTHOR: &str = "strand <strand@localhost>";

pub fn run(message: &str) -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    // 2. Consolidate the stage into a commit on the active branch
    let summary = repo.commit_staged(message, AUTHOR)?;

    println!("{}", summary.id);
    println!(
        "{} file(s) changes. {} file(s) created",
        summary.changed, summary.created
    );
    Ok(())
}
