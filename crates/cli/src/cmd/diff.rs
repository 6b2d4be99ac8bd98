//! Show working-tree changes against HEAD

use crate::pager;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fmt::Write;
use strand_core::{diff, worktree, DiffLine, Repository};

pub fn run() -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    // 2. Scan the working tree against HEAD's manifest
    let head = repo.head_commit()?;
    let status = worktree::status_scan(&repo, &head.manifest)?;

    if status.modified.is_empty() && status.missing.is_empty() {
        println!("No changes");
        return Ok(());
    }

    // 3. Render a per-file diff for every modified file
    let mut out = String::new();
    for path in &status.modified {
        let old = repo.blobs().get(head.manifest[path.as_str()])?;
        let new = std::fs::read(repo.root().join(path))?;

        if diff::is_binary(&old) || diff::is_binary(&new) {
            writeln!(out, "{} - binary files differ", path)?;
            writeln!(out)?;
            continue;
        }

        let file_diff = diff::render(&old, &new);
        writeln!(
            out,
            "{} - {} inserts(+), {} deletions(-)",
            path, file_diff.inserts, file_diff.deletions
        )?;
        for line in &file_diff.lines {
            match line {
                DiffLine::Context(l) => writeln!(out, " {}", l.dimmed())?,
                DiffLine::Insert(l) => writeln!(out, "{}", format!("+{}", l).green())?,
                DiffLine::Delete(l) => writeln!(out, "{}", format!("-{}", l).red())?,
                DiffLine::Elision => writeln!(out, "...")?,
            }
        }
        writeln!(out)?;
    }

    // 4. Deleted tracked files have no content to diff, list them
    for path in &status.missing {
        writeln!(out, "{} - deleted", path.red())?;
        writeln!(out)?;
    }

    pager::page(&out);
    Ok(())
}
