//! Pipe long output through the user's pager

use std::io::Write;
use std::process::{Command, Stdio};

/// Send text through `less -FXr`, printing directly when it is unavailable
pub fn page(text: &str) {
    match Command::new("less")
        .arg("-FXr")
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
        }
        Err(_) => print!("{}", text),
    }
}
