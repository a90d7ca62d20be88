//! Insight database operations

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::insights::InsightStore;
use crate::models::{Commit, Insight, NewInsight, Severity};

const INSIGHT_COLUMNS: &str = "id, summary, reasoning, severity, related_commits, generated_at";

/// An insight row as stored, with JSON columns still encoded
struct InsightRow {
    id: i64,
    summary: String,
    reasoning: String,
    severity: String,
    related_commits: String,
    generated_at: String,
}

impl InsightRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            summary: row.get(1)?,
            reasoning: row.get(2)?,
            severity: row.get(3)?,
            related_commits: row.get(4)?,
            generated_at: row.get(5)?,
        })
    }

    fn into_insight(self) -> Result<Insight> {
        let severity: Severity = self.severity.parse().map_err(Error::InvalidData)?;
        let generated_at = DateTime::parse_from_rfc3339(&self.generated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                Error::InvalidData(format!(
                    "Insight {} has invalid generated_at {:?}: {}",
                    self.id, self.generated_at, e
                ))
            })?;

        Ok(Insight {
            id: self.id,
            summary: self.summary,
            reasoning: serde_json::from_str(&self.reasoning)?,
            severity,
            related_commits: serde_json::from_str(&self.related_commits)?,
            generated_at,
        })
    }
}

/// Fixed-width UTC form so text ordering matches time ordering
fn format_generated_at(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    /// Persist a new insight; prior insights are never touched
    pub fn insert_insight(&self, insight: &NewInsight) -> Result<Insight> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO insights (summary, reasoning, severity, related_commits, generated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                insight.summary,
                serde_json::to_string(&insight.reasoning)?,
                insight.severity.as_str(),
                serde_json::to_string(&insight.related_commits)?,
                format_generated_at(&insight.generated_at)
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, severity = %insight.severity, "Insight persisted");

        Ok(insight.clone().with_id(id))
    }

    /// The most recently generated insight
    pub fn get_latest_insight(&self) -> Result<Option<Insight>> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM insights ORDER BY generated_at DESC, id DESC LIMIT 1",
                    INSIGHT_COLUMNS
                ),
                [],
                InsightRow::from_row,
            )
            .optional()?;

        row.map(InsightRow::into_insight).transpose()
    }

    /// Get an insight by ID
    pub fn get_insight(&self, id: i64) -> Result<Option<Insight>> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!("SELECT {} FROM insights WHERE id = ?", INSIGHT_COLUMNS),
                params![id],
                InsightRow::from_row,
            )
            .optional()?;

        row.map(InsightRow::into_insight).transpose()
    }

    /// Insight history, newest first
    pub fn list_insights(&self, limit: usize) -> Result<Vec<Insight>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM insights ORDER BY generated_at DESC, id DESC LIMIT ?",
            INSIGHT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![limit as i64], InsightRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(InsightRow::into_insight).collect()
    }

    /// Count persisted insights
    pub fn count_insights(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM insights", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl InsightStore for Database {
    fn read_all_ordered(&self) -> Result<Vec<Commit>> {
        self.list_commits_chronological()
    }

    fn read_latest_insight(&self) -> Result<Option<Insight>> {
        self.get_latest_insight()
    }

    fn append_insight(&self, insight: &NewInsight) -> Result<Insight> {
        self.insert_insight(insight)
    }
}
