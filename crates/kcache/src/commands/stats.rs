//! Cache statistics.

use anyhow::Result;
use colored::Colorize;
use kcache_core::KnowledgeCache;

use super::print_json;

pub fn execute(cache: &KnowledgeCache, json: bool) -> Result<()> {
    let stats = cache.stats();

    if json {
        return print_json(&stats);
    }

    println!("{}", "Knowledge Cache".bold());
    println!("{}", "═".repeat(40));
    println!("  Root: {}", cache.root().display().to_string().dimmed());
    println!(
        "  Hot:     {:>4} / {:<4} {}",
        stats.hot_count,
        stats.max_hot,
        stale_note(stats.stale_hot)
    );
    println!(
        "  Recent:  {:>4} / {:<4} {}",
        stats.recent_count,
        stats.max_recent,
        stale_note(stats.stale_recent)
    );
    println!("  Archive: {:>4}", stats.archive_count);
    println!();
    println!("  Promote after: {} uses", stats.promote_threshold);
    println!("  Stale after:   {} days", stats.decay_days);
    Ok(())
}

fn stale_note(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!("({} stale)", count).yellow().to_string()
    }
}
