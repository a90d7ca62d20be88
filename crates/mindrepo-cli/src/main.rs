//! MindRepo CLI - Version control for your mind
//!
//! Usage:
//!   mindrepo init                              Initialize database
//!   mindrepo add --title T --category C        Log a commit
//!   mindrepo insight [--refresh]               Show the current insight
//!   mindrepo serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Seed => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_seed(&db)
        }
        Commands::Add {
            title,
            category,
            description,
            effort,
            at,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(
                &db,
                &title,
                &category,
                description.as_deref(),
                effort,
                at.as_deref(),
                json,
            )
        }
        Commands::Log {
            category,
            search,
            limit,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_log(&db, category, search, limit, json)
        }
        Commands::Edit {
            id,
            title,
            description,
            clear_description,
            category,
            effort,
            at,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let at = at.as_deref().map(commands::parse_at).transpose()?;
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            let update = mindrepo_core::models::CommitUpdate {
                title,
                description,
                category,
                effort,
                timestamp: at,
            };
            commands::cmd_edit(&db, id, &update)
        }
        Commands::Rm { id } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_rm(&db, id)
        }
        Commands::Insight { refresh, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insight(&db, refresh, json)
        }
        Commands::Insights { limit, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insights(&db, limit, json)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                allowed_origins.as_deref(),
            )
            .await
        }
    }
}
