//! Strand CLI - strand command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod pager;
mod util;

/// Strand - minimal linear version control
#[derive(Parser)]
#[command(name = "strand")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a repository in the current directory
    Init,
    /// Stage files for the next commit
    Add {
        /// Files to stage (globs are expanded by the shell)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Commit staged changes
    Commit {
        /// Commit message
        message: String,
    },
    /// Show branch, staged, and modified status
    Status,
    /// Show history, newest first
    Log {
        /// Commit id or branch name (default: HEAD)
        target: Option<String>,
    },
    /// List branches, or create one from HEAD
    Branch {
        /// Branch name to create
        name: Option<String>,
    },
    /// Create a tag at HEAD
    Tag {
        /// Tag name
        name: String,
    },
    /// List tags
    Tags,
    /// Check out a branch
    Checkout {
        /// Branch name
        branch: String,
    },
    /// Show working-tree changes against HEAD
    Diff,
    /// Export the commit graph as a Graphviz dot file
    Graph,
    /// Show repository summary
    Info,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => cmd::init::run(),
        Commands::Add { paths } => cmd::add::run(&paths),
        Commands::Commit { message } => cmd::commit::run(&message),
        Commands::Status => cmd::status::run(),
        Commands::Log { target } => cmd::log::run(target.as_deref()),
        Commands::Branch { name } => cmd::branch::run(name.as_deref()),
        Commands::Tag { name } => cmd::tag::run_create(&name),
        Commands::Tags => cmd::tag::run_list(),
        Commands::Checkout { branch } => cmd::checkout::run(&branch),
        Commands::Diff => cmd::diff::run(),
        Commands::Graph => cmd::graph::run(),
        Commands::Info => cmd::info::run(),
    }
}
