//! Show branch, staged, and modified status

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use strand_core::{worktree, Repository};

pub fn run() -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    // 2. Active branch
    println!("Current branch: {}", repo.refs().head()?.cyan());
    println!();

    // 3. Staged paths
    let staged = repo.stage().staged()?;
    if staged.is_empty() {
        println!("No staged files");
    } else {
        println!("{}", "Staged files:".bold());
        for path in &staged {
            println!("    {}", path);
        }
    }
    println!();

    // 4. Working tree vs HEAD's manifest
    let head = repo.head_commit()?;
    let status = worktree::status_scan(&repo, &head.manifest)?;

    if !status.modified.is_empty() {
        println!("{}", "Unstaged modified files:".bold());
        for path in &status.modified {
            println!("    {}", path.yellow());
        }
    }
    if !status.missing.is_empty() {
        println!("{}", "Deleted files:".bold());
        for path in &status.missing {
            println!("    {}", path.red());
        }
    }

    Ok(())
}
