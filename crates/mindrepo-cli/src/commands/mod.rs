//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, seed) and shared utilities (open_db)
//! - `commits` - Commit commands (add, log, edit, rm)
//! - `insights` - Insight commands (current, refresh, history)
//! - `serve` - Web server command

pub mod commits;
pub mod core;
pub mod insights;
pub mod serve;

// Re-export command functions for main.rs
pub use commits::*;
pub use core::*;
pub use insights::*;
pub use serve::*;

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset};
use mindrepo_core::models::parse_timestamp;

/// Truncate to `max` characters, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse an `--at` argument (RFC 3339, or offset-less which is read as UTC)
pub fn parse_at(raw: &str) -> Result<DateTime<FixedOffset>> {
    parse_timestamp(raw).ok_or_else(|| anyhow!("Invalid timestamp '{}' (expected RFC 3339)", raw))
}
