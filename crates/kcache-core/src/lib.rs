//! kcache-core - Tiered knowledge cache
//!
//! A file-resident store of short learnings organised into three tiers:
//!
//! - **recent**: bounded FIFO ring of new learnings, newest first
//! - **hot**: bounded set of promoted, frequently used learnings
//! - **archive**: unbounded resting place for everything that falls out
//!
//! Modules:
//!
//! - **store**: whole-tier JSON persistence with atomic replace
//! - **heat**: usage/recency scoring and staleness
//! - **policy**: promotion, demotion and overflow rules
//! - **cache**: the [`KnowledgeCache`] handle and its mutating operations
//! - **rotation**: the maintenance pass and its interval gate
//! - **query**: listing, lookup and search

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod heat;
pub mod policy;
pub mod query;
pub mod rotation;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use cache::{KnowledgeCache, UsageReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, ConfigValidationError};
pub use error::{Error, Result};
pub use heat::HeatModel;
pub use rotation::RotationGate;
pub use store::EntryStore;
pub use types::{CacheStats, Entry, RotationResult, SaveOptions, ScoredEntry, Source, Tier};
