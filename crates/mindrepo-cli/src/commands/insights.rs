//! Insight command implementations

use anyhow::Result;
use chrono::Utc;
use mindrepo_core::db::Database;
use mindrepo_core::models::{Insight, Severity};
use mindrepo_core::{insights, Error};

use super::truncate;

fn severity_badge(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "\x1b[31mHIGH\x1b[0m",
        Severity::Medium => "\x1b[33mMEDIUM\x1b[0m",
        Severity::Low => "\x1b[32mLOW\x1b[0m",
    }
}

fn print_insight(insight: &Insight) {
    println!();
    println!("💡 {} ({})", insight.summary, severity_badge(insight.severity));
    println!("   ─────────────────────────────");
    for line in &insight.reasoning {
        println!("   {}", line);
    }
    if !insight.related_commits.is_empty() {
        let ids: Vec<String> = insight
            .related_commits
            .iter()
            .map(|id| format!("#{}", id))
            .collect();
        println!("   Related: {}", ids.join(", "));
    }
    println!(
        "   Generated: {}",
        insight.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
}

/// Show the current insight, or generate a new one with `refresh`
pub fn cmd_insight(db: &Database, refresh: bool, json: bool) -> Result<()> {
    let now = Utc::now();
    let result = if refresh {
        insights::refresh_insight(db, now)
    } else {
        insights::current_insight(db, now)
    };

    let insight = match result {
        Ok(insight) => insight,
        Err(Error::InsufficientData) => {
            println!("Not enough data to generate insights. Log a commit first:");
            println!("  mindrepo add --title \"Read a chapter\" --category Learning");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&insight)?);
    } else {
        print_insight(&insight);
    }

    Ok(())
}

pub fn cmd_insights(db: &Database, limit: usize, json: bool) -> Result<()> {
    let history = db.list_insights(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No insights yet. Generate one with: mindrepo insight");
        return Ok(());
    }

    println!();
    println!("📜 Insight History");
    println!("   ─────────────────────────────────────────────────────────────");

    for insight in history {
        println!(
            "   {} │ {:<6} │ {}",
            insight.generated_at.format("%Y-%m-%d %H:%M"),
            insight.severity.as_str(),
            truncate(&insight.summary, 40)
        );
    }

    Ok(())
}
