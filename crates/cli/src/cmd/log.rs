//! Show commit history, newest first

use crate::{pager, util};
use anyhow::{anyhow, Context, Result};
use std::fmt::Write;
use strand_core::{ObjectId, Repository};

pub fn run(target: Option<&str>) -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    // 2. Resolve the starting commit: explicit id, branch name, or HEAD
    let start = match target {
        Some(arg) if arg.len() == 64 => {
            let id =
                ObjectId::from_hex(arg).map_err(|_| anyhow!("invalid commit '{}'", arg))?;
            if !repo.commits().contains(id) {
                return Err(anyhow!("invalid commit '{}'", arg));
            }
            id
        }
        Some(branch) => repo.refs().resolve_branch(branch)?,
        None => repo.refs().head_commit()?,
    };

    // 3. Walk the chain, stopping before the root sentinel
    let mut out = String::new();
    for commit in repo.commits().ancestors(start)? {
        let commit = commit?;
        writeln!(out, "{}", commit.id)?;
        writeln!(out, "date: {}", util::format_local_time(&commit.timestamp))?;
        writeln!(out, "author: {}", commit.author)?;
        writeln!(out, "message: {}", commit.message)?;
        writeln!(out)?;
    }

    pager::page(&out);
    Ok(())
}
