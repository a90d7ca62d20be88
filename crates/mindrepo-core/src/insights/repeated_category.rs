//! Repeated Category Rule
//!
//! Fires when the three most recent commits all share one category. That can
//! mean a strong focus session or being stuck, so it is reported at `medium`.

use crate::models::{Commit, Severity};

use super::engine::Rule;
use super::types::{Candidate, RuleContext, RuleKind};

/// Number of trailing commits that must share a category
pub const STREAK_LENGTH: usize = 3;

pub struct RepeatedCategoryRule;

impl Rule for RepeatedCategoryRule {
    fn kind(&self) -> RuleKind {
        RuleKind::RepeatedCategory
    }

    fn name(&self) -> &'static str {
        "Repeated Category"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Candidate> {
        evaluate(ctx.history)
    }
}

/// Evaluate against commits in ascending timestamp order
pub fn evaluate(history: &[Commit]) -> Option<Candidate> {
    if history.len() < STREAK_LENGTH {
        return None;
    }

    let recent = &history[history.len() - STREAK_LENGTH..];
    let category = &recent[0].category;
    if !recent.iter().all(|c| &c.category == category) {
        return None;
    }

    Some(
        Candidate::new(
            RuleKind::RepeatedCategory,
            Severity::Medium,
            format!("Locked In: {}", category),
        )
        .with_reason(format!(
            "Your last {} commits were all '{}'.",
            STREAK_LENGTH, category
        ))
        .with_reason("This indicates a strong focus session or possibly getting stuck.")
        .with_related(recent.iter().map(|c| c.id)),
    )
}
