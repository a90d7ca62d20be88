//! Commit (activity record) database operations

use chrono::{DateTime, FixedOffset, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{parse_timestamp, Commit, CommitFilter, CommitUpdate, NewCommit};

const COMMIT_COLUMNS: &str = "id, title, description, category, effort, timestamp";

/// A commit row as stored, before its timestamp is parsed
struct CommitRow {
    id: i64,
    title: String,
    description: Option<String>,
    category: String,
    effort: i64,
    timestamp: String,
}

impl CommitRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category: row.get(3)?,
            effort: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }

    fn into_commit(self) -> Result<Commit> {
        let timestamp = parse_timestamp(&self.timestamp).ok_or_else(|| Error::MalformedRecord {
            id: self.id,
            timestamp: self.timestamp.clone(),
        })?;

        Ok(Commit {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            effort: self.effort,
            timestamp,
        })
    }
}

fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339()
}

/// Sort ascending by timestamp, then id
fn sort_chronologically(commits: &mut [Commit]) {
    commits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
}

impl Database {
    /// Insert a new commit, stamping it with the current time if no timestamp was given
    pub fn create_commit(&self, commit: &NewCommit) -> Result<Commit> {
        commit.validate()?;
        let conn = self.conn()?;

        let timestamp = commit
            .timestamp
            .unwrap_or_else(|| Utc::now().fixed_offset());

        conn.execute(
            r#"
            INSERT INTO commits (title, description, category, effort, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                commit.title.trim(),
                commit.description,
                commit.category.trim(),
                commit.effort,
                format_timestamp(&timestamp)
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, category = %commit.category, "Commit created");

        Ok(Commit {
            id,
            title: commit.title.trim().to_string(),
            description: commit.description.clone(),
            category: commit.category.trim().to_string(),
            effort: commit.effort,
            timestamp,
        })
    }

    /// Get a commit by ID
    pub fn get_commit(&self, id: i64) -> Result<Option<Commit>> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!("SELECT {} FROM commits WHERE id = ?", COMMIT_COLUMNS),
                params![id],
                CommitRow::from_row,
            )
            .optional()?;

        row.map(CommitRow::into_commit).transpose()
    }

    /// All commits in ascending chronological order (ties broken by id)
    ///
    /// Fails with `MalformedRecord` if any stored timestamp cannot be parsed;
    /// such rows are never skipped.
    pub fn list_commits_chronological(&self) -> Result<Vec<Commit>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM commits ORDER BY id ASC",
            COMMIT_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], CommitRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut commits = rows
            .into_iter()
            .map(CommitRow::into_commit)
            .collect::<Result<Vec<_>>>()?;
        sort_chronologically(&mut commits);

        Ok(commits)
    }

    /// List commits newest first with optional filters and pagination
    pub fn list_commits(&self, filter: &CommitFilter) -> Result<Vec<Commit>> {
        let conn = self.conn()?;

        let mut sql = format!("SELECT {} FROM commits WHERE 1=1", COMMIT_COLUMNS);
        let mut values: Vec<String> = Vec::new();

        if let Some(category) = &filter.category {
            sql.push_str(" AND category = ?");
            values.push(category.clone());
        }
        if let Some(search) = &filter.search {
            sql.push_str(
                " AND (title LIKE '%' || ? || '%' OR COALESCE(description, '') LIKE '%' || ? || '%')",
            );
            values.push(search.clone());
            values.push(search.clone());
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), CommitRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut commits = rows
            .into_iter()
            .map(CommitRow::into_commit)
            .collect::<Result<Vec<_>>>()?;

        // Date bounds are applied after parsing so mixed offsets compare correctly
        commits.retain(|c| {
            filter.from.map_or(true, |from| c.timestamp >= from)
                && filter.to.map_or(true, |to| c.timestamp <= to)
        });
        sort_chronologically(&mut commits);
        commits.reverse();

        Ok(commits
            .into_iter()
            .skip(filter.skip)
            .take(filter.limit)
            .collect())
    }

    /// Apply a partial update; returns `None` if the commit does not exist
    pub fn update_commit(&self, id: i64, update: &CommitUpdate) -> Result<Option<Commit>> {
        update.validate()?;

        let Some(mut commit) = self.get_commit(id)? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(commit));
        }

        commit.apply(update);

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE commits
            SET title = ?, description = ?, category = ?, effort = ?, timestamp = ?
            WHERE id = ?
            "#,
            params![
                commit.title,
                commit.description,
                commit.category,
                commit.effort,
                format_timestamp(&commit.timestamp),
                id
            ],
        )?;

        debug!(id, "Commit updated");
        Ok(Some(commit))
    }

    /// Delete a commit; returns whether a row was removed
    pub fn delete_commit(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM commits WHERE id = ?", params![id])?;
        if deleted > 0 {
            debug!(id, "Commit deleted");
        }
        Ok(deleted > 0)
    }

    /// Count all commits
    pub fn count_commits(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM commits", [], |row| row.get(0))?;
        Ok(count)
    }
}
