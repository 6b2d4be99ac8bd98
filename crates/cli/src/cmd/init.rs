//! Initialize a repository

use anyhow::Result;
use strand_core::Repository;

pub fn run() -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let repo = Repository::init(&current_dir)?;

    println!(
        "Initialized strand repository in {}",
        repo.meta_dir().display()
    );
    Ok(())
}
