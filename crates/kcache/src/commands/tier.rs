//! Manual tier transitions: promote, demote, archive.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use kcache_core::{KnowledgeCache, Tier};
use serde_json::json;

use super::{print_json, tier_label};

/// Which manual move to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Promote,
    Demote,
    Archive,
}

impl Move {
    fn target(self) -> Tier {
        match self {
            Move::Promote => Tier::Hot,
            Move::Demote => Tier::Recent,
            Move::Archive => Tier::Archive,
        }
    }

    /// Tiers searched for the id, used in the not-found message
    fn searched(self) -> &'static str {
        match self {
            Move::Promote => "recent or hot",
            Move::Demote => "hot",
            Move::Archive => "recent or hot",
        }
    }
}

/// Execute a manual transition. A missing id is an error.
pub fn execute(cache: &KnowledgeCache, action: Move, id: &str, json: bool) -> Result<()> {
    let found = match action {
        Move::Promote => cache.promote(id),
        Move::Demote => cache.demote(id),
        Move::Archive => cache.archive(id),
    }
    .with_context(|| format!("Failed to move {} to {}", id, action.target()))?;

    if !found {
        bail!("Learning not found in {}: {}", action.searched(), id);
    }

    if json {
        return print_json(&json!({ "id": id, "tier": action.target() }));
    }

    println!(
        "{} {} is now in {}",
        "✓".green(),
        id.bold(),
        tier_label(action.target())
    );
    Ok(())
}
