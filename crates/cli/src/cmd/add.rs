//! Stage files for the next commit

use anyhow::{Context, Result};
use std::path::PathBuf;
use strand_core::Repository;

pub fn run(paths: &[PathBuf]) -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    // 2. Stage, best-effort: report each rejected path and keep going
    let outcome = repo.stage().stage(paths)?;
    for (_path, err) in &outcome.rejected {
        eprintln!("error: {}", err);
    }

    Ok(())
}
