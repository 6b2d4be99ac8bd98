//! Export the commit graph as a Graphviz dot file

use anyhow::{Context, Result};
use std::fmt::Write;
use strand_core::Repository;

pub fn run() -> Result<()> {
    // 1. Find repository
    let repo = Repository::discover().context("Failed to find repository")?;

    let mut out = String::new();
    out.push_str("digraph strand {\nrankdir=\"TB\";\n");

    // 2. One node per non-root commit, edges along parent links
    for id in repo.commits().list_ids()? {
        let commit = repo.commits().read_header(id)?;
        if commit.is_root() {
            continue;
        }

        writeln!(
            out,
            "commit_{} [label=\"{}\"]",
            id,
            commit.message.replace('"', "\\\"")
        )?;

        // The root commit is not drawn, so neither is its edge
        let parent = repo.commits().read_header(commit.parent)?;
        if parent.is_root() {
            continue;
        }
        writeln!(out, "commit_{} -> commit_{}", commit.parent, id)?;
    }

    // 3. Branch boxes at the same rank as their commit
    for (name, id) in repo.refs().branches()? {
        writeln!(out, "\"{}\" [shape=box]", name)?;
        writeln!(out, "{{rank=same; \"{}\" -> commit_{}}}", name, id)?;
    }

    // 4. HEAD box pointing at the active branch
    let head = repo.refs().head()?;
    out.push_str("HEAD [shape=box, color=red]\n");
    writeln!(out, "HEAD -> \"{}\"", head)?;
    out.push_str("}\n");

    std::fs::write("strand.dot", &out)?;
    println!("Wrote strand.dot");
    Ok(())
}
