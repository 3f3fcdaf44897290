//! The tiered knowledge cache.
//!
//! [`KnowledgeCache`] ties the store, the heat model and the transition rules
//! together. Every public operation is a synchronous read-modify-write of whole
//! tier files. When an entry moves between tiers the destination is written
//! before the source, so an interrupted move leaves a duplicate rather than
//! losing the entry.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::heat::HeatModel;
use crate::policy;
use crate::store::EntryStore;
use crate::types::{CacheStats, Entry, SaveOptions, Tier};
use crate::utils::{learning_id, normalize_tags, validate_content};

/// Outcome of a usage report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// The entry after its counters were bumped
    pub entry: Entry,
    /// Tier the entry lives in now
    pub tier: Tier,
    /// True when this report moved the entry from recent to hot
    pub promoted: bool,
}

/// A file-backed three-tier cache of learnings.
#[derive(Clone)]
pub struct KnowledgeCache {
    store: EntryStore,
    config: CacheConfig,
    model: HeatModel,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for KnowledgeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeCache")
            .field("root", &self.store.root())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl KnowledgeCache {
    /// Open a cache rooted at `root` using the system clock.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: EntryStore::new(root),
            model: HeatModel::new(config.decay_days),
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn model(&self) -> &HeatModel {
        &self.model
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create a learning at the front of recent.
    ///
    /// Empty content is rejected before anything is read or written.
    pub fn save(&self, content: &str, context: &str, options: SaveOptions) -> Result<Entry> {
        validate_content(content)?;
        let tags = normalize_tags(&options.tags);
        let source = options.source.unwrap_or_default();

        let now = self.now();
        let id = self.unique_id(&now);
        let entry = Entry::new(id, content.trim(), context.trim(), tags, source, &now);

        let mut recent = self.store.load(Tier::Recent);
        recent.insert(0, entry.clone());
        self.write_recent_with_overflow(recent)?;

        info!(id = %entry.id, source = %entry.source, "Saved learning");
        Ok(entry)
    }

    /// Record one use of `id` wherever it lives.
    ///
    /// A recent entry reaching the promotion threshold moves to the front of
    /// hot. Returns `None` when the id is unknown.
    pub fn record_usage(&self, id: &str) -> Result<Option<UsageReport>> {
        let now = self.now();

        let mut recent = self.store.load(Tier::Recent);
        if let Some(index) = recent.iter().position(|e| e.id == id) {
            recent[index].touch(&now);

            if !policy::should_promote(&recent[index], self.config.promote_threshold) {
                let entry = recent[index].clone();
                self.store.save(Tier::Recent, &recent)?;
                return Ok(Some(UsageReport {
                    entry,
                    tier: Tier::Recent,
                    promoted: false,
                }));
            }

            let entry = recent.remove(index);
            let mut hot = self.store.load(Tier::Hot);
            hot.insert(0, entry.clone());
            self.store.save(Tier::Hot, &hot)?;
            self.store.save(Tier::Recent, &recent)?;

            info!(id, use_count = entry.use_count, "Promoted learning to hot");
            return Ok(Some(UsageReport {
                entry,
                tier: Tier::Hot,
                promoted: true,
            }));
        }

        for tier in [Tier::Hot, Tier::Archive] {
            let mut entries = self.store.load(tier);
            if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
                entry.touch(&now);
                let entry = entry.clone();
                self.store.save(tier, &entries)?;
                return Ok(Some(UsageReport {
                    entry,
                    tier,
                    promoted: false,
                }));
            }
        }

        Ok(None)
    }

    /// Move a recent entry to the front of hot.
    ///
    /// An entry already in hot counts as found and stays put.
    pub fn promote(&self, id: &str) -> Result<bool> {
        let mut recent = self.store.load(Tier::Recent);
        if let Some(entry) = policy::take_by_id(&mut recent, id) {
            let mut hot = self.store.load(Tier::Hot);
            hot.insert(0, entry);
            self.store.save(Tier::Hot, &hot)?;
            self.store.save(Tier::Recent, &recent)?;
            info!(id, "Promoted learning to hot");
            return Ok(true);
        }

        Ok(self.store.load(Tier::Hot).iter().any(|e| e.id == id))
    }

    /// Move a hot entry to the front of recent, archiving any overflow.
    pub fn demote(&self, id: &str) -> Result<bool> {
        let mut hot = self.store.load(Tier::Hot);
        let Some(entry) = policy::take_by_id(&mut hot, id) else {
            return Ok(false);
        };

        let mut recent = self.store.load(Tier::Recent);
        recent.insert(0, entry);
        self.write_recent_with_overflow(recent)?;
        self.store.save(Tier::Hot, &hot)?;

        info!(id, "Demoted learning to recent");
        Ok(true)
    }

    /// Move an entry from recent or hot (searched in that order) to the
    /// front of archive.
    pub fn archive(&self, id: &str) -> Result<bool> {
        for tier in [Tier::Recent, Tier::Hot] {
            let mut entries = self.store.load(tier);
            let Some(entry) = policy::take_by_id(&mut entries, id) else {
                continue;
            };

            let mut archive = self.store.load(Tier::Archive);
            archive.insert(0, entry);
            self.store.save(Tier::Archive, &archive)?;
            self.store.save(tier, &entries)?;

            info!(id, from = %tier, "Archived learning");
            return Ok(true);
        }
        Ok(false)
    }

    /// Tier sizes, staleness counts and the active limits.
    pub fn stats(&self) -> CacheStats {
        let now = self.now();
        let recent = self.store.load(Tier::Recent);
        let hot = self.store.load(Tier::Hot);
        let archive_count = self.store.load(Tier::Archive).len();

        let stale = |entries: &[Entry]| entries.iter().filter(|e| self.model.is_stale(e, &now)).count();

        CacheStats {
            recent_count: recent.len(),
            hot_count: hot.len(),
            archive_count,
            stale_hot: stale(&hot),
            stale_recent: stale(&recent),
            max_recent: self.config.max_recent,
            max_hot: self.config.max_hot,
            promote_threshold: self.config.promote_threshold,
            decay_days: self.config.decay_days,
        }
    }

    /// Write recent, first moving anything past capacity to the end of
    /// archive. Returns the number of entries archived.
    pub(crate) fn write_recent_with_overflow(&self, mut recent: Vec<Entry>) -> Result<usize> {
        let overflow = policy::take_recent_overflow(&mut recent, self.config.max_recent);
        let moved = overflow.len();

        if moved > 0 {
            let mut archive = self.store.load(Tier::Archive);
            archive.extend(overflow);
            self.store.save(Tier::Archive, &archive)?;
            info!(count = moved, "Archived recent overflow");
        }

        self.store.save(Tier::Recent, &recent)?;
        Ok(moved)
    }

    /// Timestamp id for `now`, suffixed `_2`, `_3`, ... if already taken.
    fn unique_id(&self, now: &DateTime<Utc>) -> String {
        let base = learning_id(now);
        let taken: HashSet<String> = Tier::QUERY_ORDER
            .iter()
            .flat_map(|tier| self.store.load(*tier))
            .map(|e| e.id)
            .filter(|id| id.starts_with(&base))
            .collect();

        if !taken.contains(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or(base)
    }
}
