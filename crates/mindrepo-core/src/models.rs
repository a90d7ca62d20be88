//! Domain models for MindRepo

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Lowest accepted effort score
pub const MIN_EFFORT: i64 = 1;

/// Highest accepted effort score
pub const MAX_EFFORT: i64 = 5;

/// A logged unit of work or effort ("commit")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Free-form tag such as "Coding" or "Health"
    pub category: String,
    /// Informal 1-5 effort score
    pub effort: i64,
    pub timestamp: DateTime<FixedOffset>,
}

impl Commit {
    /// Apply a partial update field-by-field
    ///
    /// Fields left as `None` in the update keep their current value.
    /// `description: Some(None)` clears the description. Title and category
    /// are trimmed the same way as on insert.
    pub fn apply(&mut self, update: &CommitUpdate) {
        if let Some(title) = &update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(category) = &update.category {
            self.category = category.trim().to_string();
        }
        if let Some(effort) = update.effort {
            self.effort = effort;
        }
        if let Some(timestamp) = update.timestamp {
            self.timestamp = timestamp;
        }
    }
}

/// New commit for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommit {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default = "default_effort")]
    pub effort: i64,
    /// Defaults to the insertion time when absent
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}

fn default_effort() -> i64 {
    MIN_EFFORT
}

impl NewCommit {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: category.into(),
            effort: MIN_EFFORT,
            timestamp: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_effort(mut self, effort: i64) -> Self {
        self.effort = effort;
        self
    }

    pub fn at(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Reject blank titles/categories and out-of-range effort
    pub fn validate(&self) -> Result<()> {
        validate_text("title", &self.title)?;
        validate_text("category", &self.category)?;
        validate_effort(self.effort)
    }
}

/// Partial update for an existing commit; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitUpdate {
    #[serde(default)]
    pub title: Option<String>,
    /// Absent keeps the description, `null` clears it
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub effort: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl CommitUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.effort.is_none()
            && self.timestamp.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_text("title", title)?;
        }
        if let Some(category) = &self.category {
            validate_text("category", category)?;
        }
        if let Some(effort) = self.effort {
            validate_effort(effort)?;
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidData(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn validate_effort(effort: i64) -> Result<()> {
    if !(MIN_EFFORT..=MAX_EFFORT).contains(&effort) {
        return Err(Error::InvalidData(format!(
            "effort must be between {} and {}, got {}",
            MIN_EFFORT, MAX_EFFORT, effort
        )));
    }
    Ok(())
}

/// Filters for listing commits (newest first)
#[derive(Debug, Clone)]
pub struct CommitFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Substring match against title or description
    pub search: Option<String>,
    /// Inclusive lower bound on timestamp
    pub from: Option<DateTime<FixedOffset>>,
    /// Inclusive upper bound on timestamp
    pub to: Option<DateTime<FixedOffset>>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for CommitFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            from: None,
            to: None,
            skip: 0,
            limit: 100,
        }
    }
}

/// Severity of an insight
///
/// Variant order is significant: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A persisted insight produced by one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub id: i64,
    pub summary: String,
    /// Ordered explanation; the first entry is the primary justification
    pub reasoning: Vec<String>,
    pub severity: Severity,
    /// Ids of the commits that justify this insight (no duplicates)
    pub related_commits: Vec<i64>,
    pub generated_at: DateTime<Utc>,
}

/// An insight ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInsight {
    pub summary: String,
    pub reasoning: Vec<String>,
    pub severity: Severity,
    pub related_commits: Vec<i64>,
    pub generated_at: DateTime<Utc>,
}

impl NewInsight {
    /// The default insight used when history exists but no rule fires
    pub fn nominal(generated_at: DateTime<Utc>) -> Self {
        Self {
            summary: "All systems nominal".to_string(),
            reasoning: vec![
                "Steady progress detected.".to_string(),
                "No immediate anomalies.".to_string(),
            ],
            severity: Severity::Low,
            related_commits: vec![],
            generated_at,
        }
    }

    pub fn with_id(self, id: i64) -> Insight {
        Insight {
            id,
            summary: self.summary,
            reasoning: self.reasoning,
            severity: self.severity,
            related_commits: self.related_commits,
            generated_at: self.generated_at,
        }
    }
}

/// Parse a stored or submitted timestamp
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00Z`, `2024-05-01T09:30:00+02:00`) and
/// offset-less ISO 8601 (`2024-05-01T09:30:00.123456`), which is read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Wrap any present value (including `null`) in `Some`; absence falls back to `default`
fn deserialize_present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}
