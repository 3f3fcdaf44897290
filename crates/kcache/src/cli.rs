//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kcache_core::Tier;

/// Tiered knowledge cache
///
/// Save short learnings, report when they were useful, and let rotation keep
/// the recent and hot tiers small.
#[derive(Parser, Debug)]
#[command(name = "kcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Learnings directory (overrides the config file)
    #[arg(long, global = true, env = "KCACHE_DIR")]
    pub dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a new learning into the recent tier
    Save {
        /// The learning itself
        content: String,

        /// Where or why it was captured
        #[arg(short, long, default_value = "")]
        context: String,

        /// Tags for categorization
        #[arg(short = 'T', long = "tag", action = clap::ArgAction::Append)]
        tags: Vec<String>,

        /// Provenance: auto, manual or review (default: auto)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Record that a learning was useful (may promote it to hot)
    Use {
        /// Learning ID
        id: String,
    },

    /// Show one learning with its heat
    Show {
        /// Learning ID
        id: String,
    },

    /// List hot and recent learnings
    List {
        /// Include the archive
        #[arg(short, long)]
        archive: bool,

        /// Only this tier: recent, hot or archive
        #[arg(short, long, conflicts_with = "archive")]
        tier: Option<Tier>,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show hot learnings ranked by heat
    Hot,

    /// Search content, context and tags (case-insensitive)
    Search {
        /// Text to look for
        query: String,
    },

    /// Move a learning from recent to hot
    Promote {
        /// Learning ID
        id: String,
    },

    /// Move a learning from hot back to recent
    Demote {
        /// Learning ID
        id: String,
    },

    /// Move a learning from recent or hot to the archive
    Archive {
        /// Learning ID
        id: String,
    },

    /// Run one rotation pass now
    Rotate,

    /// Rotate only if the configured interval has elapsed
    Maintain {
        /// Keep running and re-check periodically until Ctrl+C
        #[arg(short, long)]
        watch: bool,

        /// Seconds between checks in watch mode
        #[arg(long, default_value = "3600")]
        every: u64,
    },

    /// Show tier sizes and limits
    Stats,
}
