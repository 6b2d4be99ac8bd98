//! Shared utilities for CLI commands

use chrono::{DateTime, Local, Utc};
use std::io::Write;

/// Ask a yes/no question on stdin
///
/// Empty or unreadable input falls back to `default`.
pub fn yes_no(prompt: &str, default: bool) -> bool {
    if default {
        print!("{} [Y/n]: ", prompt);
    } else {
        print!("{} [y/N]: ", prompt);
    }
    let _ = std::io::stdout().flush();

    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return default;
    }

    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}

/// Format a commit timestamp in local time
pub fn format_local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %z")
        .to_string()
}
