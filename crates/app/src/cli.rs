use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "screening", version, about = "Score and keep screening test results.")]
pub struct Args {
    /// TOML config file.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// `SQLite` database URL or path; overrides the config file.
    #[arg(long, value_name = "URL")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session reading commands from stdin (default).
    Repl,
    /// Search comma-separated subject ids once and print their scores.
    Search {
        #[arg(required = true, num_args = 1.., value_name = "IDS")]
        ids: Vec<String>,
        /// Save every successfully scored subject.
        #[arg(long)]
        save: bool,
    },
    /// Print saved results, best first.
    List,
    /// Delete a saved result.
    Delete { subject_id: String },
    /// Set or clear (with no text) the note on a saved result.
    Note {
        subject_id: String,
        #[arg(num_args = 0.., value_name = "TEXT")]
        text: Vec<String>,
    },
}

/// One line typed into the REPL.
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReplCommand {
    /// Search comma-separated subject ids.
    Search {
        #[arg(required = true, num_args = 1.., value_name = "IDS")]
        ids: Vec<String>,
    },
    /// Save a subject scored in this session.
    Save { subject_id: String },
    /// Delete a saved result.
    Delete { subject_id: String },
    /// Set or clear the note on a saved result.
    Note {
        subject_id: String,
        #[arg(num_args = 0.., value_name = "TEXT")]
        text: Vec<String>,
    },
    /// Show this session's search results, most recent first.
    Results,
    /// Show saved results, best first.
    List,
    /// Forget every subject searched this session.
    Clear,
    /// Leave the session.
    #[command(alias = "exit")]
    Quit,
}
