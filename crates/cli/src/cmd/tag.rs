//! Tag management
//!
//! Tags are create-only pointers: created at the current HEAD commit and
//! frozen there, never advanced as history moves on.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use strand_core::Repository;

/// Create a new tag at HEAD
pub fn run_create(name: &str) -> Result<()> {
    let repo = Repository::discover().context("Failed to find repository")?;

    let head_id = repo.refs().head_commit()?;
    repo.refs().create_tag(name, head_id)?;

    println!("Created tag {}", name.cyan());
    Ok(())
}

/// List all tags
pub fn run_list() -> Result<()> {
    let repo = Repository::discover().context("Failed to find repository")?;

    for (name, id) in repo.refs().tags()? {
        println!("{} {}", name, id);
    }
    Ok(())
}
