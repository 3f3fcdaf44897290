//! Read-only commands: list, hot, search.

use anyhow::Result;
use colored::Colorize;
use kcache_core::{Entry, KnowledgeCache, Tier};

use super::{TieredEntry, print_entry_line, print_json, truncate};

/// List hot and recent learnings, optionally with the archive, or a single
/// tier when `tier` is given.
pub fn list(
    cache: &KnowledgeCache,
    archive: bool,
    tier: Option<Tier>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let loaded: Vec<(Tier, Entry)> = match tier {
        Some(tier) => cache
            .list_tier(tier)
            .into_iter()
            .map(|entry| (tier, entry))
            .collect(),
        None => cache.list_with_tiers(archive),
    };
    let rows: Vec<TieredEntry<'_>> = loaded
        .iter()
        .map(|(tier, entry)| TieredEntry { tier: *tier, entry })
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("{}", "No learnings yet.".yellow());
        println!("  Use {} to add one.", "kcache save".cyan());
        return Ok(());
    }

    for row in &rows {
        print_entry_line(row.entry, Some(row.tier));
    }
    Ok(())
}

/// Hot learnings ranked by heat.
pub fn hot(cache: &KnowledgeCache, json: bool) -> Result<()> {
    let ranked = cache.get_ranked_hot();

    if json {
        return print_json(&ranked);
    }

    if ranked.is_empty() {
        println!("{}", "Hot tier is empty.".yellow());
        return Ok(());
    }

    println!("{}", "Hot Learnings".bold());
    println!("{}", "═".repeat(60));
    for scored in &ranked {
        let marker = if scored.is_stale {
            "○".yellow()
        } else {
            "●".red()
        };
        println!(
            "{} {:>5.1} {} {}",
            marker,
            scored.heat,
            scored.entry.id.bold(),
            truncate(&scored.entry.content, 60)
        );
    }
    Ok(())
}

/// Substring search across all tiers.
pub fn search(cache: &KnowledgeCache, query: &str, json: bool) -> Result<()> {
    let hits = cache.search(query);

    if json {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("{}", format!("No learnings match '{}'.", query).yellow());
        return Ok(());
    }

    println!("{} match(es) for '{}'", hits.len(), query.cyan());
    for entry in &hits {
        print_entry_line(entry, None);
    }
    Ok(())
}
