//! Wellbeing Rule
//!
//! Flags recent commits whose title or description mention fatigue or anxiety.
//! Matching is a case-insensitive substring check, so "retired" matches "tired".

use crate::models::{Commit, Severity};

use super::engine::Rule;
use super::types::{Candidate, RuleContext, RuleKind};

/// Terms that flag a commit
pub const KEYWORDS: [&str; 5] = ["sleep", "tired", "anxious", "burnout", "exhausted"];

/// How many trailing commits are scanned
pub const SCAN_WINDOW: usize = 10;

pub struct WellbeingRule;

impl Rule for WellbeingRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Wellbeing
    }

    fn name(&self) -> &'static str {
        "Wellbeing"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Candidate> {
        evaluate(ctx.history)
    }
}

/// Whether a commit's title or description contains any keyword
pub fn mentions_wellbeing(commit: &Commit) -> bool {
    let title = commit.title.to_lowercase();
    let description = commit
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    KEYWORDS
        .iter()
        .any(|kw| title.contains(kw) || description.contains(kw))
}

/// Evaluate against commits in ascending timestamp order
pub fn evaluate(history: &[Commit]) -> Option<Candidate> {
    let start = history.len().saturating_sub(SCAN_WINDOW);
    let flagged: Vec<i64> = history[start..]
        .iter()
        .filter(|c| mentions_wellbeing(c))
        .map(|c| c.id)
        .collect();

    if flagged.is_empty() {
        return None;
    }

    Some(
        Candidate::new(RuleKind::Wellbeing, Severity::High, "Wellbeing check")
            .with_reason("Detected keywords related to fatigue or anxiety in recent logs.")
            .with_reason("Prioritize rest.")
            .with_related(flagged),
    )
}
