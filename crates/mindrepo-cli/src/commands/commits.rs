//! Commit command implementations

use anyhow::{bail, Result};
use mindrepo_core::db::Database;
use mindrepo_core::models::{CommitFilter, CommitUpdate, NewCommit};

use super::{parse_at, truncate};

pub fn cmd_add(
    db: &Database,
    title: &str,
    category: &str,
    description: Option<&str>,
    effort: i64,
    at: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut new_commit = NewCommit::new(title, category).with_effort(effort);
    if let Some(description) = description {
        new_commit = new_commit.with_description(description);
    }
    if let Some(at) = at {
        new_commit = new_commit.at(parse_at(at)?);
    }

    let commit = db.create_commit(&new_commit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&commit)?);
    } else {
        println!(
            "✅ Committed #{} [{}] {}",
            commit.id, commit.category, commit.title
        );
    }

    Ok(())
}

pub fn cmd_log(
    db: &Database,
    category: Option<String>,
    search: Option<String>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let filter = CommitFilter {
        category,
        search,
        limit,
        ..Default::default()
    };
    let commits = db.list_commits(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&commits)?);
        return Ok(());
    }

    if commits.is_empty() {
        println!("No commits found. Log one with:");
        println!("  mindrepo add --title \"Read a chapter\" --category Learning");
        return Ok(());
    }

    println!();
    println!("📝 Recent Commits");
    println!("   ─────────────────────────────────────────────────────────────");

    for commit in commits {
        println!(
            "   {:>4} │ {} │ {:<10} │ {} │ {}",
            commit.id,
            commit.timestamp.format("%Y-%m-%d %H:%M"),
            truncate(&commit.category, 10),
            "●".repeat(commit.effort.clamp(0, 5) as usize),
            truncate(&commit.title, 40)
        );
    }

    Ok(())
}

pub fn cmd_edit(db: &Database, id: i64, update: &CommitUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --description, --clear-description, --category, --effort, --at");
    }

    match db.update_commit(id, update)? {
        Some(commit) => {
            println!("✏️  Updated #{} [{}] {}", commit.id, commit.category, commit.title);
            Ok(())
        }
        None => bail!("Commit #{} not found", id),
    }
}

pub fn cmd_rm(db: &Database, id: i64) -> Result<()> {
    if !db.delete_commit(id)? {
        bail!("Commit #{} not found", id);
    }

    println!("🗑️  Deleted commit #{}", id);
    Ok(())
}
