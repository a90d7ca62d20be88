//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MindRepo - Version control for your mind
#[derive(Parser)]
#[command(name = "mindrepo")]
#[command(about = "Log units of effort and get rule-based insights about them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "mindrepo.db", global = true, env = "MINDREPO_DB")]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set MINDREPO_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Insert demo commits into an empty database
    Seed,

    /// Log a new commit
    Add {
        /// Short title of the work
        #[arg(short, long)]
        title: String,

        /// Category such as Coding, Learning, Health
        #[arg(short, long)]
        category: String,

        /// Longer free-form description
        #[arg(short, long)]
        description: Option<String>,

        /// Effort score from 1 to 5
        #[arg(short, long, default_value = "1")]
        effort: i64,

        /// When the work happened (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Print the created commit as JSON
        #[arg(long)]
        json: bool,
    },

    /// List commits, newest first
    Log {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Substring to match in title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Number of commits to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit fields of an existing commit
    Edit {
        /// Commit ID
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        effort: Option<i64>,

        /// New timestamp (RFC 3339)
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete a commit
    Rm {
        /// Commit ID
        id: i64,
    },

    /// Show the current insight (generated on first use)
    Insight {
        /// Generate a fresh insight from the current history
        #[arg(short, long)]
        refresh: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show previously generated insights, newest first
    Insights {
        /// Number of insights to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Comma-separated CORS origins (empty = same-origin only)
        #[arg(long, env = "MINDREPO_ALLOWED_ORIGINS")]
        allowed_origins: Option<String>,
    },
}
