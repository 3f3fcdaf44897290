//! Learning capture: save, use, show.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use kcache_core::{KnowledgeCache, SaveOptions, Source};
use serde_json::json;

use super::{print_entry_detail, print_json, tier_label};

/// Save a new learning into recent.
pub fn save(
    cache: &KnowledgeCache,
    content: &str,
    context: &str,
    tags: Vec<String>,
    source: Option<String>,
    json: bool,
) -> Result<()> {
    let mut options = SaveOptions::default().with_tags(tags);
    if let Some(source) = source {
        let source: Source = source.parse().context("Invalid --source")?;
        options = options.with_source(source);
    }

    let entry = cache
        .save(content, context, options)
        .context("Failed to save learning")?;

    if json {
        return print_json(&entry);
    }

    println!("{} Learning saved", "✓".green());
    println!("  ID: {}", entry.id.bold());
    if !entry.tags.is_empty() {
        println!("  Tags: {}", entry.tags.join(", ").dimmed());
    }
    Ok(())
}

/// Record one use of a learning.
pub fn record_use(cache: &KnowledgeCache, id: &str, json: bool) -> Result<()> {
    let Some(report) = cache
        .record_usage(id)
        .context("Failed to record usage")?
    else {
        bail!("Learning not found: {}", id);
    };
    let scored = cache.model().score(report.entry, &cache.now());

    if json {
        return print_json(&json!({
            "tier": report.tier,
            "promoted": report.promoted,
            "entry": scored,
        }));
    }

    println!(
        "{} Recorded use of {} ({} uses, heat {:.1})",
        "✓".green(),
        scored.entry.id.bold(),
        scored.entry.use_count,
        scored.heat
    );
    if report.promoted {
        println!("  {} Promoted to {}", "↑".green(), tier_label(report.tier));
    }
    Ok(())
}

/// Show one learning with its tier and heat.
pub fn show(cache: &KnowledgeCache, id: &str, json: bool) -> Result<()> {
    let Some((tier, entry)) = cache.locate(id) else {
        bail!("Learning not found: {}", id);
    };
    let scored = cache.model().score(entry, &cache.now());

    if json {
        return print_json(&json!({ "tier": tier, "entry": scored }));
    }

    println!("{} {}", "Learning".bold(), format!("[{}]", tier_label(tier)));
    print_entry_detail(&scored.entry);
    let stale = if scored.is_stale {
        " (stale)".yellow().to_string()
    } else {
        String::new()
    };
    println!("  Heat: {:.2}{}", scored.heat, stale);
    Ok(())
}
