//! Activity Gap Rule
//!
//! Fires when more than a week of whole days has passed since the latest
//! commit. "Now" is injected so the boundary can be tested exactly.

use chrono::{DateTime, Utc};

use crate::models::{Commit, Severity};

use super::engine::Rule;
use super::types::{Candidate, RuleContext, RuleKind};

/// Gaps strictly longer than this many whole days fire the rule
pub const GAP_THRESHOLD_DAYS: i64 = 7;

pub struct ActivityGapRule;

impl Rule for ActivityGapRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ActivityGap
    }

    fn name(&self) -> &'static str {
        "Activity Gap"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Candidate> {
        evaluate(ctx.history, ctx.now)
    }
}

/// Whole days between the commit and `now`, truncated toward zero
///
/// `now` is first expressed in the commit's own offset.
pub fn days_since(commit: &Commit, now: DateTime<Utc>) -> i64 {
    let now = now.with_timezone(&commit.timestamp.timezone());
    (now - commit.timestamp).num_days()
}

/// Evaluate against commits in ascending timestamp order
pub fn evaluate(history: &[Commit], now: DateTime<Utc>) -> Option<Candidate> {
    let latest = history.last()?;

    let days = days_since(latest, now);
    if days <= GAP_THRESHOLD_DAYS {
        return None;
    }

    Some(
        Candidate::new(RuleKind::ActivityGap, Severity::High, "Rust Detected")
            .with_reason(format!(
                "It's been over {} days since your last commit.",
                days
            ))
            .with_reason("Consider smaller tasks to regain momentum.")
            .with_related([latest.id]),
    )
}
