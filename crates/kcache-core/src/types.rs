//! Cache Type Definitions
//!
//! Defines the entry record, tier identifiers and the result shapes returned
//! by the cache operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::utils::{format_timestamp, parse_timestamp};

/// Cache tier (recent, hot, archive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Bounded FIFO ring, newest first
    Recent,
    /// Bounded promoted working set
    Hot,
    /// Unbounded terminal tier
    Archive,
}

impl Tier {
    /// All tiers in query order (hot first)
    pub const QUERY_ORDER: [Tier; 3] = [Tier::Hot, Tier::Recent, Tier::Archive];

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Hot => "hot",
            Self::Archive => "archive",
        }
    }

    /// Backing file name inside the store root
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Recent => "recent.json",
            Self::Hot => "hot.json",
            Self::Archive => "archive.json",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" | "r" => Ok(Self::Recent),
            "hot" | "h" => Ok(Self::Hot),
            "archive" | "a" => Ok(Self::Archive),
            other => Err(Error::invalid_input(format!(
                "unknown tier: {other} (expected recent, hot or archive)"
            ))),
        }
    }
}

/// Where a learning came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Entered by a person
    Manual,
    /// Produced during a review pass
    Review,
    /// Captured automatically by a hook or agent.
    /// Unknown provenance strings on disk also decode to this.
    #[default]
    #[serde(other)]
    Auto,
}

impl Source {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            "review" => Ok(Self::Review),
            other => Err(Error::invalid_input(format!(
                "unknown source: {other} (expected auto, manual or review)"
            ))),
        }
    }
}

/// One stored learning.
///
/// Timestamps are kept as the strings found on disk so that records written
/// by other tools survive a load/save cycle untouched; use
/// [`Entry::created_at_time`] and [`Entry::last_used_time`] to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_count: u32,
    #[serde(default)]
    pub last_used: Option<String>,
}

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Entry {
    /// A fresh, never-used learning created at `created_at`
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        context: impl Into<String>,
        tags: Vec<String>,
        source: Source,
        created_at: &DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            context: context.into(),
            tags,
            source,
            created_at: format_timestamp(created_at),
            use_count: 0,
            last_used: None,
        }
    }

    /// Parsed creation time, if the stored string is readable
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Parsed last-use time, if set and readable
    pub fn last_used_time(&self) -> Option<DateTime<Utc>> {
        self.last_used.as_deref().and_then(parse_timestamp)
    }

    /// Reference point for recency: last use, else creation
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_used_time().or_else(|| self.created_at_time())
    }

    /// Record one use at `now`
    pub fn touch(&mut self, now: &DateTime<Utc>) {
        self.use_count = self.use_count.saturating_add(1);
        self.last_used = Some(format_timestamp(now));
    }

    /// Case-insensitive substring match on content, context or any tag.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.content.to_lowercase().contains(needle)
            || self.context.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Options for saving a new learning
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    pub tags: Vec<String>,
    pub source: Option<Source>,
}

impl SaveOptions {
    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }
}

/// An entry annotated with its computed heat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub heat: f64,
    pub is_stale: bool,
}

/// Counts produced by one rotation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationResult {
    /// Hot entries moved back to recent (stale but well used, or over capacity)
    pub hot_demoted: usize,
    /// Stale, rarely used hot entries moved straight to archive
    pub hot_archived: usize,
    /// Recent entries moved to archive because the ring overflowed.
    /// Includes overflow caused by `hot_demoted` entries earlier in the same
    /// pass: demotions land in recent uncapped and the final step archives
    /// whatever no longer fits.
    pub recent_archived: usize,
}

impl RotationResult {
    /// Total number of relocated entries
    pub fn total(&self) -> usize {
        self.hot_demoted + self.hot_archived + self.recent_archived
    }

    /// True when the pass moved nothing
    pub fn is_noop(&self) -> bool {
        self.total() == 0
    }
}

/// Tier sizes, staleness counts and the active configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub recent_count: usize,
    pub hot_count: usize,
    pub archive_count: usize,
    pub stale_hot: usize,
    pub stale_recent: usize,
    pub max_recent: usize,
    pub max_hot: usize,
    pub promote_threshold: u32,
    pub decay_days: u32,
}
