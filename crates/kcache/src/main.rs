//! kcache - Tiered knowledge cache CLI
//!
//! Thin wrapper over kcache-core: every cache operation is a subcommand.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use commands::tier::Move;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so --json output stays clean
    let filter = EnvFilter::from_default_env().add_directive("kcache=info".parse()?);
    let (json_layer, text_layer) = if cli.log_json {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (None, Some(fmt::layer().with_writer(std::io::stderr)))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    // Load configuration
    let config = config::Config::load()?;
    let cache = config.open_cache(cli.dir)?;
    let json = cli.json;

    // Execute command
    match cli.command {
        Commands::Save {
            content,
            context,
            tags,
            source,
        } => commands::learning::save(&cache, &content, &context, tags, source, json),
        Commands::Use { id } => commands::learning::record_use(&cache, &id, json),
        Commands::Show { id } => commands::learning::show(&cache, &id, json),
        Commands::List {
            archive,
            tier,
            limit,
        } => commands::query::list(&cache, archive, tier, limit, json),
        Commands::Hot => commands::query::hot(&cache, json),
        Commands::Search { query } => commands::query::search(&cache, &query, json),
        Commands::Promote { id } => commands::tier::execute(&cache, Move::Promote, &id, json),
        Commands::Demote { id } => commands::tier::execute(&cache, Move::Demote, &id, json),
        Commands::Archive { id } => commands::tier::execute(&cache, Move::Archive, &id, json),
        Commands::Rotate => commands::maintain::rotate(&cache, json),
        Commands::Maintain { watch, every } => {
            commands::maintain::maintain(&cache, watch, every, json).await
        }
        Commands::Stats => commands::stats::execute(&cache, json),
    }
}
