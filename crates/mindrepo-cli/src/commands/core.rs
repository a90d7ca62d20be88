//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_seed` - Insert demo commits

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use mindrepo_core::{db::Database, seed::seed_demo_data};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let commits = db.count_commits()?;
    println!("   {} commits on record", commits);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Log some work: mindrepo add --title \"Wrote parser\" --category Coding");
    println!("  2. Get an insight: mindrepo insight");
    println!("  3. Start web UI: mindrepo serve");

    Ok(())
}

pub fn cmd_seed(db: &Database) -> Result<()> {
    let inserted = seed_demo_data(db, Utc::now()).context("Failed to seed demo data")?;

    if inserted == 0 {
        println!("Database already has commits; nothing seeded.");
    } else {
        println!("🌱 Seeded {} demo commits", inserted);
        println!("   Try: mindrepo insight --refresh");
    }

    Ok(())
}
