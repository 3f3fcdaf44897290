//! Command implementations for kcache CLI.
//!
//! Each submodule implements the logic for a command group. Shared rendering
//! helpers live here.

pub mod learning;
pub mod maintain;
pub mod query;
pub mod stats;
pub mod tier;

use anyhow::Result;
use colored::{ColoredString, Colorize};
use kcache_core::{Entry, Tier};
use serde::Serialize;

/// An entry tagged with the tier it was found in
#[derive(Debug, Serialize)]
pub struct TieredEntry<'a> {
    pub tier: Tier,
    #[serde(flatten)]
    pub entry: &'a Entry,
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Coloured tier label
pub fn tier_label(tier: Tier) -> ColoredString {
    match tier {
        Tier::Hot => "hot".red().bold(),
        Tier::Recent => "recent".cyan(),
        Tier::Archive => "archive".dimmed(),
    }
}

/// One-line summary: id, uses and a clipped content preview.
pub fn print_entry_line(entry: &Entry, tier: Option<Tier>) {
    let label = tier
        .map(|t| format!("[{}] ", tier_label(t)))
        .unwrap_or_default();
    println!(
        "{}{} {} {}",
        label,
        entry.id.bold(),
        format!("({}x)", entry.use_count).dimmed(),
        truncate(&entry.content, 72)
    );
}

/// Multi-line detail view.
pub fn print_entry_detail(entry: &Entry) {
    println!("  ID: {}", entry.id.bold());
    println!("  Content: {}", entry.content);
    if !entry.context.is_empty() {
        println!("  Context: {}", entry.context.dimmed());
    }
    if !entry.tags.is_empty() {
        println!("  Tags: {}", entry.tags.join(", ").dimmed());
    }
    println!("  Source: {}", entry.source);
    println!("  Created: {}", entry.created_at);
    println!("  Uses: {}", entry.use_count);
    if let Some(ref last_used) = entry.last_used {
        println!("  Last used: {}", last_used);
    }
}

/// Clip `s` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    let single_line = s.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
