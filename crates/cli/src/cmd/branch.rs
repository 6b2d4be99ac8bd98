//! List branches or create one from HEAD

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use strand_core::Repository;

pub fn run(name: Option<&str>) -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    match name {
        // 2a. Create a branch at the current HEAD commit
        Some(name) => {
            let head_id = repo.refs().head_commit()?;
            repo.refs().create_branch(name, head_id)?;
            println!("Created branch {}", name.cyan());
        }
        // 2b. List branches, the active one starred
        None => {
            let current = repo.refs().head()?;
            for (branch, _) in repo.refs().branches()? {
                if branch == current {
                    println!("*{}", branch);
                } else {
                    println!(" {}", branch);
                }
            }
        }
    }

    Ok(())
}
