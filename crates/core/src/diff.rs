//! Line-diff orchestration over the external matcher
//!
//! The line matching itself is `similar`'s job; this module consumes its
//! change stream: classify lines, collapse long unchanged runs, count the
//! insertions and deletions for the summary header, and annotate each line
//! for display.

use similar::{ChangeTag, TextDiff};

/// Lines kept at each edge of a collapsed equal run
const CONTEXT_EDGE: usize = 3;

/// One display line of a rendered diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Unchanged line (prefixed with a space when printed)
    Context(String),
    /// Inserted line (`+` prefix)
    Insert(String),
    /// Deleted line (`-` prefix)
    Delete(String),
    /// Marker standing in for a collapsed equal run (`...`)
    Elision,
}

/// A rendered per-file diff with its line counts
#[derive(Debug)]
pub struct FileDiff {
    pub lines: Vec<DiffLine>,
    pub inserts: usize,
    pub deletions: usize,
}

impl FileDiff {
    /// Whether the two inputs were line-identical
    pub fn is_unchanged(&self) -> bool {
        self.inserts == 0 && self.deletions == 0
    }
}

/// Check if content is binary (contains null bytes in first 8KB)
pub fn is_binary(content: &[u8]) -> bool {
    content.iter().take(8192).any(|&b| b == 0)
}

/// Diff two byte buffers line by line
pub fn render(old: &[u8], new: &[u8]) -> FileDiff {
    // Invalid UTF-8 is replaced rather than rejected; binary detection is the
    // caller's concern
    let old_text = String::from_utf8_lossy(old).into_owned();
    let new_text = String::from_utf8_lossy(new).into_owned();
    let diff = TextDiff::from_lines(&old_text, &new_text);

    // Group the change stream into runs of one tag
    let mut runs: Vec<(ChangeTag, Vec<String>)> = Vec::new();
    for change in diff.iter_all_changes() {
        let value = change.value();
        let line = value.strip_suffix('\n').unwrap_or(value).to_string();
        match runs.last_mut() {
            Some((tag, lines)) if *tag == change.tag() => lines.push(line),
            _ => runs.push((change.tag(), vec![line])),
        }
    }

    let mut out = FileDiff {
        lines: Vec::new(),
        inserts: 0,
        deletions: 0,
    };

    for (tag, lines) in runs {
        match tag {
            ChangeTag::Equal => {
                if lines.len() > CONTEXT_EDGE * 2 + 1 {
                    for line in &lines[..CONTEXT_EDGE] {
                        out.lines.push(DiffLine::Context(line.clone()));
                    }
                    out.lines.push(DiffLine::Elision);
                    for line in &lines[lines.len() - CONTEXT_EDGE..] {
                        out.lines.push(DiffLine::Context(line.clone()));
                    }
                } else {
                    for line in lines {
                        out.lines.push(DiffLine::Context(line));
                    }
                }
            }
            ChangeTag::Insert => {
                out.inserts += lines.len();
                for line in lines {
                    out.lines.push(DiffLine::Insert(line));
                }
            }
            ChangeTag::Delete => {
                out.deletions += lines.len();
                for line in lines {
                    out.lines.push(DiffLine::Delete(line));
                }
            }
        }
    }

    out
}
