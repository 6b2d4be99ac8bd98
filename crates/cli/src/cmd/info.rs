//! Show repository summary

use crate::{pager, util};
use anyhow::{Context, Result};
use std::fmt::Write;
use strand_core::Repository;

pub fn run() -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    // 2. Aggregate statistics
    let summary = repo.summary()?;

    let mut out = String::new();
    writeln!(out, "Root directory:    {}", summary.root.display())?;
    writeln!(
        out,
        "First commit date: {}",
        util::format_local_time(&summary.first_commit.timestamp)
    )?;
    writeln!(
        out,
        "Last  commit date: {}",
        util::format_local_time(&summary.last_commit.timestamp)
    )?;
    writeln!(out, "Most recent commit message:")?;
    writeln!(out, "    {}", summary.last_commit.message)?;
    writeln!(out)?;
    writeln!(
        out,
        "Number of currently tracked files: {}",
        summary.tracked_files
    )?;

    // 3. Per-branch commit counts, aligned like a table
    writeln!(out, "Branches: (name, total commits)")?;
    let name_width = summary
        .branches
        .iter()
        .map(|b| b.name.len())
        .max()
        .unwrap_or(0);
    let count_width = summary
        .branches
        .iter()
        .map(|b| b.commits.to_string().len())
        .max()
        .unwrap_or(1);
    for branch in &summary.branches {
        let marker = if branch.current { "*" } else { " " };
        writeln!(
            out,
            "    {}{:<name_width$} - {:>count_width$}",
            marker, branch.name, branch.commits
        )?;
    }
    writeln!(out)?;

    pager::page(&out);
    Ok(())
}
