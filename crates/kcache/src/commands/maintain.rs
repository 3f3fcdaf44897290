//! Rotation commands: unconditional `rotate` and gated `maintain`.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use kcache_core::{KnowledgeCache, RotationGate, RotationResult};
use serde_json::json;
use tracing::warn;

use super::print_json;

/// Run one rotation pass regardless of the gate.
pub fn rotate(cache: &KnowledgeCache, json: bool) -> Result<()> {
    let result = cache.rotate().context("Rotation failed")?;

    if json {
        return print_json(&result);
    }
    print_result(&result);
    Ok(())
}

/// Rotate if due; with `watch`, keep checking every `every` seconds until
/// Ctrl+C.
pub async fn maintain(cache: &KnowledgeCache, watch: bool, every: u64, json: bool) -> Result<()> {
    let gate = RotationGate::for_cache(cache);

    if !watch {
        let ran = check_once(cache, &gate)?;
        return report(&gate, ran, json);
    }

    if !json {
        println!("{}", "Watching for due rotations (Ctrl+C to stop)".yellow());
        println!("{}", "─".repeat(60));
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(every.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match check_once(cache, &gate) {
                    Ok(ran) => report(&gate, ran, json)?,
                    Err(e) => warn!(error = %e, "Maintenance check failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if !json {
                    println!("{}", "Stopped.".dimmed());
                }
                break;
            }
        }
    }
    Ok(())
}

/// One gated check. `Some` when a pass actually ran.
pub fn check_once(cache: &KnowledgeCache, gate: &RotationGate) -> Result<Option<RotationResult>> {
    gate.run_if_due(cache).context("Rotation failed")
}

fn report(gate: &RotationGate, ran: Option<RotationResult>, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({
            "ran": ran.is_some(),
            "result": ran,
            "last_run": gate.last_run(),
            "next_due": gate.next_due(),
        }));
    }

    let stamp = Local::now().format("%H:%M:%S");
    match ran {
        Some(result) => {
            print!("[{}] ", stamp);
            print_result(&result);
        }
        None => {
            let next = gate
                .next_due()
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "now".into());
            println!("[{}] Rotation not due until {}", stamp, next.cyan());
        }
    }
    Ok(())
}

fn print_result(result: &RotationResult) {
    if result.is_noop() {
        println!("{} Rotation complete, nothing to move", "✓".green());
        return;
    }
    println!("{} Rotation complete", "✓".green());
    println!("  Hot demoted:     {}", result.hot_demoted);
    println!("  Hot archived:    {}", result.hot_archived);
    println!("  Recent archived: {}", result.recent_archived);
}
