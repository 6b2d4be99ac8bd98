//! Check out a branch

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use strand_core::{worktree, Checkout, Repository};

pub fn run(branch: &str) -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    // 2. Reconcile; every locally modified file needs explicit consent
    let outcome = worktree::checkout(&repo, branch, |path| {
        util::yes_no(
            &format!(
                "Contents of file '{}' has changed since last commit, \
                 checking out this branch will OVERWRITE it. Proceed?",
                path
            ),
            false,
        )
    })?;

    match outcome {
        Checkout::Aborted => println!("Stopping checkout due to user input."),
        Checkout::Completed { written, deleted } => {
            tracing::debug!(written, deleted, "checkout finished");
            println!("Switched to branch {}", branch.cyan());
        }
    }
    Ok(())
}
