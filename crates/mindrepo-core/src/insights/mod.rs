//! Insight Engine - rule-based observations over activity history
//!
//! Each generation run reads the full commit history, evaluates a fixed set of
//! rules against it, picks one candidate, and appends a single insight to the
//! store.
//!
//! ## Rules (evaluated in this order)
//!
//! - **Repeated Category** - last three commits share a category (`medium`)
//! - **Activity Gap** - more than seven days since the latest commit (`high`)
//! - **Wellbeing** - fatigue/anxiety keywords in recent commits (`high`)
//!
//! When no rule fires a `low` "nominal" insight is stored instead. An empty
//! history is reported as [`Error::InsufficientData`](crate::Error::InsufficientData).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mindrepo_core::{insights, Database};
//!
//! let db = Database::new_unencrypted("mindrepo.db")?;
//! let insight = insights::current_insight(&db, chrono::Utc::now())?;
//! ```

pub mod activity_gap;
pub mod engine;
pub mod repeated_category;
pub mod types;
pub mod wellbeing;

pub use activity_gap::ActivityGapRule;
pub use engine::{
    current_insight, generate, refresh_insight, select, InsightEngine, InsightStore, Rule,
};
pub use repeated_category::RepeatedCategoryRule;
pub use types::{Candidate, RuleContext, RuleKind};
pub use wellbeing::WellbeingRule;
