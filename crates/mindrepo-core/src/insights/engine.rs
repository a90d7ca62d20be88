//! Insight Engine - orchestrates rule evaluation, selection, and persistence

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Commit, Insight, NewInsight, Severity};

use super::types::{Candidate, RuleContext, RuleKind};
use super::{ActivityGapRule, RepeatedCategoryRule, WellbeingRule};

/// Storage the engine reads history from and appends insights to
pub trait InsightStore {
    /// All commits, ascending by timestamp (ties by id)
    fn read_all_ordered(&self) -> Result<Vec<Commit>>;

    /// The most recently generated insight, if any
    fn read_latest_insight(&self) -> Result<Option<Insight>>;

    /// Persist a new insight and return it with its assigned id
    fn append_insight(&self, insight: &NewInsight) -> Result<Insight>;
}

/// A pure rule over the commit history
pub trait Rule: Send + Sync {
    fn kind(&self) -> RuleKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Produce a candidate or abstain; must not fail on any history
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Candidate>;
}

/// Pick one candidate: the first `high` one in evaluation order, otherwise the first
///
/// This is deliberately not a max-severity search: a `medium` candidate beats a
/// later `low` one only because it comes first.
pub fn select(candidates: Vec<Candidate>) -> Option<Candidate> {
    let index = candidates
        .iter()
        .position(|c| c.severity == Severity::High)
        .unwrap_or(0);
    candidates.into_iter().nth(index)
}

/// Runs rules in registration order against one snapshot of history
pub struct InsightEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules in their fixed order
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(RepeatedCategoryRule));
        engine.register(Box::new(ActivityGapRule));
        engine.register(Box::new(WellbeingRule));

        engine
    }

    /// Append a rule; it is evaluated after every rule registered before it
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Registered rules in evaluation order
    pub fn rule_kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|r| r.kind()).collect()
    }

    /// Evaluate every rule, dropping abstentions, in evaluation order
    pub fn evaluate(&self, history: &[Commit], now: DateTime<Utc>) -> Vec<Candidate> {
        debug_assert!(
            history
                .windows(2)
                .all(|w| (w[0].timestamp, w[0].id) <= (w[1].timestamp, w[1].id)),
            "history must be in ascending timestamp order"
        );

        let ctx = RuleContext::new(history, now);

        self.rules
            .iter()
            .filter_map(|rule| {
                let candidate = rule.evaluate(&ctx);
                debug!(
                    rule = rule.kind().as_str(),
                    fired = candidate.is_some(),
                    "Rule evaluated"
                );
                candidate
            })
            .collect()
    }

    /// Generate and persist exactly one insight
    ///
    /// Returns `InsufficientData` for an empty history. Store errors are
    /// propagated as-is.
    pub fn generate<S>(&self, store: &S, now: DateTime<Utc>) -> Result<Insight>
    where
        S: InsightStore + ?Sized,
    {
        let history = store.read_all_ordered()?;
        if history.is_empty() {
            debug!("No commits found, skipping insight generation");
            return Err(Error::InsufficientData);
        }

        let candidates = self.evaluate(&history, now);
        let fired = candidates.len();

        let new_insight = match select(candidates) {
            Some(candidate) => {
                debug!(rule = candidate.rule.as_str(), "Candidate selected");
                candidate.into_new_insight(now)
            }
            None => NewInsight::nominal(now),
        };

        let insight = store.append_insight(&new_insight)?;
        info!(
            id = insight.id,
            severity = %insight.severity,
            summary = %insight.summary,
            commits = history.len(),
            fired,
            "Insight generated"
        );

        Ok(insight)
    }

    /// The latest stored insight, generating one if none exists yet
    pub fn current<S>(&self, store: &S, now: DateTime<Utc>) -> Result<Insight>
    where
        S: InsightStore + ?Sized,
    {
        match store.read_latest_insight()? {
            Some(insight) => Ok(insight),
            None => self.generate(store, now),
        }
    }
}

/// Generate with the built-in rules
pub fn generate<S>(store: &S, now: DateTime<Utc>) -> Result<Insight>
where
    S: InsightStore + ?Sized,
{
    InsightEngine::new().generate(store, now)
}

/// "Get current insight": reuse the latest, or generate once if there is none
pub fn current_insight<S>(store: &S, now: DateTime<Utc>) -> Result<Insight>
where
    S: InsightStore + ?Sized,
{
    InsightEngine::new().current(store, now)
}

/// "Refresh insight": always generate a new one
pub fn refresh_insight<S>(store: &S, now: DateTime<Utc>) -> Result<Insight>
where
    S: InsightStore + ?Sized,
{
    generate(store, now)
}
