//! Demo data for a fresh database

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::db::Database;
use crate::error::Result;
use crate::models::NewCommit;

/// (title, category, effort, days relative to now, description)
const DEMO_COMMITS: [(&str, &str, i64, i64, &str); 7] = [
    (
        "Initial Project Research",
        "Learning",
        3,
        -10,
        "Researched architecture patterns for MindRepo.",
    ),
    (
        "Setup Backend Environment",
        "Coding",
        2,
        -9,
        "Installed the toolchain and configured the workspace.",
    ),
    (
        "Database Schema Design",
        "Coding",
        4,
        -8,
        "Designed SQLite schema and relationships.",
    ),
    (
        "Felt tired, stopped early",
        "Health",
        1,
        -7,
        "Burnout detected, needed sleep.",
    ),
    (
        "Frontend Layout",
        "Coding",
        3,
        -2,
        "Created the timeline layout.",
    ),
    (
        "Refactoring Components",
        "Coding",
        2,
        -1,
        "Cleaned up messy code in Timeline.",
    ),
    (
        "Implement Insights",
        "Coding",
        5,
        0,
        "Added rule logic for the insights engine.",
    ),
];

/// Insert the demo commits if the database has none
///
/// Returns how many commits were inserted (0 when data already exists).
pub fn seed_demo_data(db: &Database, now: DateTime<Utc>) -> Result<usize> {
    if db.count_commits()? > 0 {
        info!("Database already has commits, skipping seed");
        return Ok(0);
    }

    for (title, category, effort, delta_days, description) in DEMO_COMMITS {
        let commit = NewCommit::new(title, category)
            .with_description(description)
            .with_effort(effort)
            .at((now + Duration::days(delta_days)).fixed_offset());
        db.create_commit(&commit)?;
    }

    info!(count = DEMO_COMMITS.len(), "Seeded demo commits");
    Ok(DEMO_COMMITS.len())
}
