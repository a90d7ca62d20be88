//! Core types for the Insight Engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Commit, NewInsight, Severity};

/// The rules known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    RepeatedCategory,
    ActivityGap,
    Wellbeing,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::RepeatedCategory => "repeated_category",
            RuleKind::ActivityGap => "activity_gap",
            RuleKind::Wellbeing => "wellbeing",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input shared by every rule in one evaluation pass
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Commits in ascending timestamp order
    pub history: &'a [Commit],
    /// The moment of evaluation
    pub now: DateTime<Utc>,
}

impl<'a> RuleContext<'a> {
    pub fn new(history: &'a [Commit], now: DateTime<Utc>) -> Self {
        Self { history, now }
    }

    /// The most recent `n` commits (fewer if history is shorter), oldest first
    pub fn most_recent(&self, n: usize) -> &'a [Commit] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub fn latest(&self) -> Option<&'a Commit> {
        self.history.last()
    }
}

/// An unpersisted insight proposed by a single rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub rule: RuleKind,
    pub summary: String,
    pub reasoning: Vec<String>,
    pub severity: Severity,
    pub related_commits: Vec<i64>,
}

impl Candidate {
    pub fn new(rule: RuleKind, severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            rule,
            summary: summary.into(),
            reasoning: vec![],
            severity,
            related_commits: vec![],
        }
    }

    /// Append a line of reasoning (order is preserved)
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }

    /// Cite commits; ids already cited are ignored
    pub fn with_related(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        for id in ids {
            if !self.related_commits.contains(&id) {
                self.related_commits.push(id);
            }
        }
        self
    }

    /// Turn the candidate into a persistable insight
    pub fn into_new_insight(self, generated_at: DateTime<Utc>) -> NewInsight {
        NewInsight {
            summary: self.summary,
            reasoning: self.reasoning,
            severity: self.severity,
            related_commits: self.related_commits,
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_commits_collapse_duplicates() {
        let candidate = Candidate::new(RuleKind::Wellbeing, Severity::High, "x")
            .with_related([3, 1, 3])
            .with_related([1, 7]);
        assert_eq!(candidate.related_commits, vec![3, 1, 7]);
    }

    #[test]
    fn test_most_recent_handles_short_history() {
        let ctx = RuleContext::new(&[], Utc::now());
        assert!(ctx.most_recent(10).is_empty());
        assert!(ctx.latest().is_none());
    }

    #[test]
    fn test_rule_kind_serialization() {
        assert_eq!(RuleKind::ActivityGap.as_str(), "activity_gap");
        assert_eq!(
            serde_json::to_string(&RuleKind::RepeatedCategory).unwrap(),
            "\"repeated_category\""
        );
    }
}
