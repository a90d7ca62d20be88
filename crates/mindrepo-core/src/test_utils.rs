//! Test utilities for mindrepo-core
//!
//! Builders for commits at fixed offsets from "now" and in-memory
//! `InsightStore` doubles for exercising the engine without SQLite.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::error::{Error, Result};
use crate::insights::InsightStore;
use crate::models::{Commit, Insight, NewInsight};

/// Build a commit with no description and effort 1
pub fn commit(id: i64, title: &str, category: &str, timestamp: DateTime<FixedOffset>) -> Commit {
    Commit {
        id,
        title: title.to_string(),
        description: None,
        category: category.to_string(),
        effort: 1,
        timestamp,
    }
}

pub fn hours_ago(now: DateTime<Utc>, hours: i64) -> DateTime<FixedOffset> {
    (now - Duration::hours(hours)).fixed_offset()
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<FixedOffset> {
    (now - Duration::days(days)).fixed_offset()
}

/// In-memory store; commits are sorted on read like the real store
#[derive(Default)]
pub struct MemoryStore {
    commits: Vec<Commit>,
    insights: Mutex<Vec<Insight>>,
}

impl MemoryStore {
    pub fn with_commits(commits: Vec<Commit>) -> Self {
        Self {
            commits,
            insights: Mutex::new(vec![]),
        }
    }

    /// Every appended insight, oldest first
    pub fn insights(&self) -> Vec<Insight> {
        self.insights.lock().unwrap().clone()
    }
}

impl InsightStore for MemoryStore {
    fn read_all_ordered(&self) -> Result<Vec<Commit>> {
        let mut commits = self.commits.clone();
        commits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(commits)
    }

    fn read_latest_insight(&self) -> Result<Option<Insight>> {
        Ok(self.insights.lock().unwrap().last().cloned())
    }

    fn append_insight(&self, insight: &NewInsight) -> Result<Insight> {
        let mut insights = self.insights.lock().unwrap();
        let stored = insight.clone().with_id(insights.len() as i64 + 1);
        insights.push(stored.clone());
        Ok(stored)
    }
}

/// Store whose every operation fails with an I/O error
pub struct FailingStore;

impl FailingStore {
    fn error() -> Error {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "store unavailable",
        ))
    }
}

impl InsightStore for FailingStore {
    fn read_all_ordered(&self) -> Result<Vec<Commit>> {
        Err(Self::error())
    }

    fn read_latest_insight(&self) -> Result<Option<Insight>> {
        Err(Self::error())
    }

    fn append_insight(&self, _insight: &NewInsight) -> Result<Insight> {
        Err(Self::error())
    }
}
