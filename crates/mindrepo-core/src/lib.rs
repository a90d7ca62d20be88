//! MindRepo Core Library
//!
//! Shared functionality for the MindRepo activity journal:
//! - Activity record ("commit") and insight models
//! - SQLite storage with connection pooling and migrations
//! - Rule-based insight engine (repeated category, activity gap, wellbeing)
//! - Demo seed data

pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod seed;

/// Test utilities including in-memory store doubles
#[cfg(test)]
pub mod test_utils;

pub use db::Database;
pub use error::{Error, Result};
pub use insights::{
    current_insight, generate, refresh_insight, select, Candidate, InsightEngine, InsightStore,
    RuleKind,
};
pub use models::{
    Commit, CommitFilter, CommitUpdate, Insight, NewCommit, NewInsight, Severity,
};
